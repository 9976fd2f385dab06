use std::collections::BTreeMap;

use maxx_account::service::auth::Registration;
use maxx_account::{FieldKey, FieldView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Profile,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub fields: Registration,
    pub submitting: bool,
    pub error: Option<String>,
}

/// What the profile page draws. Displayed values are pushed in by the
/// editor; the text being typed lives in `input` until it is committed.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub shown: BTreeMap<FieldKey, String>,
    pub editing: Option<FieldKey>,
    pub input: String,
}

impl ProfileForm {
    pub fn open(&mut self, key: FieldKey, seed: &str) {
        self.editing = Some(key);
        self.input = seed.to_string();
    }

    pub fn close(&mut self) {
        self.editing = None;
        self.input.clear();
    }
}

impl FieldView for ProfileForm {
    fn render(&mut self, key: FieldKey, value: &str) {
        if self.shown.get(&key).map(String::as_str) != Some(value) {
            self.shown.insert(key, value.to_string());
        }
    }

    fn read_buffer(&self, key: FieldKey) -> Option<String> {
        (self.editing == Some(key)).then(|| self.input.clone())
    }
}
