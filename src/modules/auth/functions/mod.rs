pub mod send_otp;
