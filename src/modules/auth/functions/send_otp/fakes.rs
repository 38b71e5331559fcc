use crate::{
    modules::{
        notification::service::sms::{self, SmsSender},
        user::repository::{User, UserDirectory},
    },
    types::{AppContext, AppEnvironment, Context, OtpContext},
    utils::graphql,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

pub fn user(id: &str, phone: &str) -> User {
    let mut data = Map::new();
    data.insert("phone".to_string(), Value::from(phone));
    User {
        id: id.to_string(),
        data: Some(data),
    }
}

pub fn context(users: Arc<FakeUsers>, sms: Arc<FakeSms>) -> Arc<Context> {
    context_with(users, sms, AppEnvironment::Development)
}

pub fn context_with(
    users: Arc<FakeUsers>,
    sms: Arc<dyn SmsSender>,
    environment: AppEnvironment,
) -> Arc<Context> {
    Arc::new(Context {
        app: AppContext { environment },
        users,
        sms,
        otp: OtpContext { length: 6 },
    })
}

pub struct FakeUsers {
    users: Vec<User>,
    lookup_fails: bool,
    update_result: bool,
    delay: Option<Duration>,
    lookups: Mutex<Vec<String>>,
    updates: Mutex<Vec<(String, String)>>,
}

impl FakeUsers {
    fn new(users: Vec<User>, lookup_fails: bool) -> Self {
        Self {
            users,
            lookup_fails,
            update_result: true,
            delay: None,
            lookups: Mutex::new(vec![]),
            updates: Mutex::new(vec![]),
        }
    }

    pub fn returning(users: Vec<User>) -> Arc<Self> {
        Arc::new(Self::new(users, false))
    }

    pub fn failing_lookup() -> Arc<Self> {
        Arc::new(Self::new(vec![], true))
    }

    pub fn slow(users: Vec<User>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::new(users, false)
        })
    }

    pub fn with_null_update(users: Vec<User>) -> Arc<Self> {
        Arc::new(Self {
            update_result: false,
            ..Self::new(users, false)
        })
    }

    /// What the fake mutation hands back for `id`.
    pub fn updated(id: &str) -> User {
        User {
            id: id.to_string(),
            data: serde_json::from_value(json!({"phone": "01760000000", "verified": false}))
                .unwrap(),
        }
    }

    /// Phones passed to `find_by_phone`, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<User>, graphql::Error> {
        self.lookups.lock().unwrap().push(phone.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.lookup_fails {
            return Err(graphql::Error::Transport("connection refused".to_string()));
        }

        Ok(self.users.clone())
    }

    async fn update_secret(&self, id: &str, secret: &str) -> Result<Option<User>, graphql::Error> {
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), secret.to_string()));

        Ok(self.update_result.then(|| Self::updated(id)))
    }
}

pub struct FakeSms {
    fails: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeSms {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            fails: false,
            sent: Mutex::new(vec![]),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fails: true,
            sent: Mutex::new(vec![]),
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send_otp(&self, phone: &str, otp: &str) -> sms::Result<()> {
        if self.fails {
            return Err(sms::Error::NotSent("gateway responded with 500".to_string()));
        }

        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), otp.to_string()));

        Ok(())
    }
}
