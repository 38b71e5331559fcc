pub mod graphql;
pub mod otp;

#[cfg(test)]
pub mod test_server;
