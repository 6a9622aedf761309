use crate::domain_model::MIN_SECRET_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    Password,
    ConfirmPassword,
    AgreeTerms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldErrorKind {
    #[error("this field is required")]
    Required,
    #[error("not a valid email address")]
    MalformedEmail,
    #[error("must be at least 6 characters")]
    TooShort,
    #[error("passwords do not match")]
    Mismatch,
    #[error("you must accept the terms")]
    NotAccepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        errors.extend(check_email(&self.email));
        errors.extend(check_password(&self.password));
        errors
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
}

impl SignupForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        errors.extend(check_email(&self.email));
        errors.extend(check_password(&self.password));

        if self.confirm_password.is_empty() {
            errors.push(FieldError {
                field: FormField::ConfirmPassword,
                kind: FieldErrorKind::Required,
            });
        } else if self.confirm_password != self.password {
            errors.push(FieldError {
                field: FormField::ConfirmPassword,
                kind: FieldErrorKind::Mismatch,
            });
        }

        if !self.agree_terms {
            errors.push(FieldError {
                field: FormField::AgreeTerms,
                kind: FieldErrorKind::NotAccepted,
            });
        }
        errors
    }
}

fn check_email(email: &str) -> Option<FieldError> {
    let kind = if email.is_empty() {
        FieldErrorKind::Required
    } else if !looks_like_email(email) {
        FieldErrorKind::MalformedEmail
    } else {
        return None;
    };
    Some(FieldError {
        field: FormField::Email,
        kind,
    })
}

fn check_password(password: &str) -> Option<FieldError> {
    let kind = if password.is_empty() {
        FieldErrorKind::Required
    } else if password.chars().count() < MIN_SECRET_LEN {
        FieldErrorKind::TooShort
    } else {
        return None;
    };
    Some(FieldError {
        field: FormField::Password,
        kind,
    })
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot with
/// something on both sides somewhere in the domain.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(errors: &[FieldError]) -> Vec<(FormField, FieldErrorKind)> {
        errors.iter().map(|e| (e.field, e.kind)).collect()
    }

    #[test]
    fn valid_login_has_no_errors() {
        let form = LoginForm {
            email: "u@test.com".into(),
            password: "abcdef".into(),
            remember: false,
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn empty_login_reports_both_fields() {
        let errors = LoginForm::default().validate();
        assert_eq!(
            kinds(&errors),
            vec![
                (FormField::Email, FieldErrorKind::Required),
                (FormField::Password, FieldErrorKind::Required),
            ]
        );
    }

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@x.com"));
        assert!(looks_like_email("first.last@mail.example.org"));
        assert!(!looks_like_email("a@x"));
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("a@.com"));
        assert!(!looks_like_email("a@x."));
        assert!(!looks_like_email("a b@x.com"));
        assert!(!looks_like_email("a@b@x.com"));
    }

    #[test]
    fn signup_checks_confirmation_and_terms() {
        let form = SignupForm {
            email: "u@test.com".into(),
            password: "abcdef".into(),
            confirm_password: "abcdeg".into(),
            agree_terms: false,
        };
        assert_eq!(
            kinds(&form.validate()),
            vec![
                (FormField::ConfirmPassword, FieldErrorKind::Mismatch),
                (FormField::AgreeTerms, FieldErrorKind::NotAccepted),
            ]
        );
    }

    #[test]
    fn short_password_is_flagged() {
        let form = SignupForm {
            email: "u@test.com".into(),
            password: "abc".into(),
            confirm_password: "abc".into(),
            agree_terms: true,
        };
        assert_eq!(
            kinds(&form.validate()),
            vec![(FormField::Password, FieldErrorKind::TooShort)]
        );
    }
}
