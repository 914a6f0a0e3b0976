/// The active CLI session: at most one current user, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub current_user_name: Option<String>,
}

impl Session {
    pub fn new(current_user_name: Option<String>) -> Self {
        Self {
            current_user_name: current_user_name.filter(|n| !n.is_empty()),
        }
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current_user_name.as_deref() == Some(name)
    }
}
