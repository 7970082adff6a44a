//! Login and signup modal state.

use crate::domain::credentials::{self, LoginRequest, SignupRequest, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Log in",
            Self::Signup => "Create account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
        }
    }

    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }
}

/// A validated form, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSubmission {
    Login(LoginRequest),
    Signup(SignupRequest),
}

/// Form contents and focus of the open modal.
///
/// Field values survive a failed submission and a switch between login and
/// signup; they are only cleared when the modal is closed after success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthModal {
    pub mode: AuthMode,
    pub focus: AuthField,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Set while a request is in flight.
    pub submitting: bool,
}

impl AuthModal {
    #[must_use]
    pub const fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            focus: Self::first_field(mode),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            submitting: false,
        }
    }

    const fn first_field(mode: AuthMode) -> AuthField {
        match mode {
            AuthMode::Login => AuthField::Email,
            AuthMode::Signup => AuthField::Name,
        }
    }

    /// Fields shown for the current mode, in focus order.
    #[must_use]
    pub const fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Signup => &[
                AuthField::Name,
                AuthField::Email,
                AuthField::Password,
                AuthField::ConfirmPassword,
            ],
        }
    }

    #[must_use]
    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Name => &self.name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm_password,
        }
    }

    fn value_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn switch_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
        self.focus = Self::first_field(self.mode);
    }

    fn focus_index(&self) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        self.focus = fields[(self.focus_index() + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        self.focus = fields[(self.focus_index() + fields.len() - 1) % fields.len()];
    }

    pub fn push_char(&mut self, c: char) {
        if !self.submitting {
            let focus = self.focus;
            self.value_mut(focus).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            let focus = self.focus;
            self.value_mut(focus).pop();
        }
    }

    /// Validates the form for the current mode.
    ///
    /// # Errors
    ///
    /// Returns the first failed validation rule; nothing may be sent then.
    pub fn validate(&self) -> Result<AuthSubmission, ValidationError> {
        match self.mode {
            AuthMode::Login => {
                credentials::validate_login(&self.email, &self.password).map(AuthSubmission::Login)
            }
            AuthMode::Signup => credentials::validate_signup(
                &self.name,
                &self.email,
                &self.password,
                &self.confirm_password,
            )
            .map(AuthSubmission::Signup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(modal: &mut AuthModal, text: &str) {
        for c in text.chars() {
            modal.push_char(c);
        }
    }

    #[test]
    fn focus_cycles_through_mode_fields() {
        let mut modal = AuthModal::new(AuthMode::Login);
        assert_eq!(modal.focus, AuthField::Email);
        modal.next_field();
        assert_eq!(modal.focus, AuthField::Password);
        modal.next_field();
        assert_eq!(modal.focus, AuthField::Email);
        modal.prev_field();
        assert_eq!(modal.focus, AuthField::Password);
    }

    #[test]
    fn switching_mode_keeps_values() {
        let mut modal = AuthModal::new(AuthMode::Login);
        type_str(&mut modal, "a@b.fi");
        modal.switch_mode();
        assert_eq!(modal.mode, AuthMode::Signup);
        assert_eq!(modal.focus, AuthField::Name);
        assert_eq!(modal.email, "a@b.fi");
    }

    #[test]
    fn input_is_ignored_while_submitting() {
        let mut modal = AuthModal::new(AuthMode::Login);
        modal.submitting = true;
        modal.push_char('x');
        assert!(modal.email.is_empty());
    }

    #[test]
    fn signup_validation_uses_all_fields() {
        let mut modal = AuthModal::new(AuthMode::Signup);
        type_str(&mut modal, "Aino");
        modal.next_field();
        type_str(&mut modal, "aino@b.fi");
        modal.next_field();
        type_str(&mut modal, "secret1");
        modal.next_field();
        type_str(&mut modal, "secret2");
        assert_eq!(modal.validate(), Err(ValidationError::PasswordMismatch));

        modal.backspace();
        modal.push_char('1');
        assert!(matches!(modal.validate(), Ok(AuthSubmission::Signup(_))));
    }
}
