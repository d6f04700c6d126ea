//! Session Context
//!
//! The signed-in session and the API client, provided via Leptos Context.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{auth, ApiClient};
use crate::models::{Session, User};

/// App-wide session handle
#[derive(Clone, Copy)]
pub struct SessionContext {
    client: StoredValue<ApiClient>,
    /// Active session - read
    pub session: ReadSignal<Option<Session>>,
    /// Active session - write
    set_session: WriteSignal<Option<Session>>,
}

impl SessionContext {
    pub fn new(client: ApiClient, session: (ReadSignal<Option<Session>>, WriteSignal<Option<Session>>)) -> Self {
        Self {
            client: StoredValue::new(client),
            session: session.0,
            set_session: session.1,
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.with(Option::is_some)
    }

    /// Show the shell for a session the auth service has already persisted
    pub fn signed_in(&self, session: Session) {
        self.set_session.set(Some(session));
    }

    /// Back to the login screen; storage must already be purged
    pub fn signed_out(&self) {
        self.set_session.set(None);
    }

    pub fn logout(&self) {
        let client = self.client();
        let ctx = *self;
        spawn_local(async move {
            auth::logout(&client).await;
            ctx.signed_out();
        });
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
