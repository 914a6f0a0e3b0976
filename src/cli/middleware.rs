use crate::cli::registry::{AppState, Command};
use crate::domain::{Session, User};
use crate::errors::{GatorError, GatorResult};
use crate::storage::traits::UserRepository;

/// Look up the session's current user, failing closed on any miss.
pub fn resolve_user<R: UserRepository>(session: &Session, users: &R) -> GatorResult<User> {
    let name = session.current_user_name.as_deref().ok_or_else(|| {
        GatorError::NotAuthenticated("no current user, run `gator login <name>`".to_string())
    })?;

    match users.get_by_name(name) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(GatorError::NotAuthenticated(format!(
            "user '{}' does not exist",
            name
        ))),
        Err(e) => Err(GatorError::NotAuthenticated(format!(
            "could not look up user '{}': {}",
            name, e
        ))),
    }
}

/// Wrap a handler that needs the logged-in user.
pub fn require_user<H>(handler: H) -> impl Fn(&mut AppState, &Command) -> GatorResult<()>
where
    H: Fn(&mut AppState, &Command, &User) -> GatorResult<()>,
{
    move |state, command| {
        let user = resolve_user(&state.session, &state.users())?;
        handler(state, command, &user)
    }
}
