// src/view.rs
//! Chooses the visible screen from auth readiness and session presence.

use crate::auth::{AuthState, Session};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Login,
    SignUp,
    Dashboard(Session),
}

/// Which unauthenticated form the user last asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthForm {
    #[default]
    Login,
    SignUp,
}

#[derive(Debug, Default)]
pub struct ViewSwitcher {
    form: AuthForm,
}

impl ViewSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> AuthForm {
        self.form
    }

    pub fn switch_to_sign_up(&mut self) {
        self.form = AuthForm::SignUp;
    }

    pub fn switch_to_login(&mut self) {
        self.form = AuthForm::Login;
    }

    pub fn current(&self, auth: &AuthState) -> View {
        if !auth.ready {
            return View::Loading;
        }

        match (&auth.session, self.form) {
            (Some(session), _) => View::Dashboard(session.clone()),
            (None, AuthForm::Login) => View::Login,
            (None, AuthForm::SignUp) => View::SignUp,
        }
    }
}

/// Header line of the dashboard.
pub fn header_line(session: &Session) -> String {
    format!("Logged in as: {}", session.email_or_empty())
}

pub fn welcome_line(session: &Session) -> String {
    format!("Welcome, {}!", session.greeting_name())
}
