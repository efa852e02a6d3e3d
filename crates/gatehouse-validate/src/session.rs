use gatehouse_core::ValidationErrors;
use serde_json::Value;
use tower_sessions::Session;

/// Flash key the web failure branch stores converted errors under
pub const ERRORS_KEY: &str = "_errors";
/// Flash key holding the decoded input of a failed request
pub const OLD_INPUT_KEY: &str = "_old_input";
/// Session key remembering the last page a browser visited
pub const PREVIOUS_URL_KEY: &str = "_previous_url";

type Result<T> = std::result::Result<T, tower_sessions::session::Error>;

/// Flash validation errors for the next request
pub async fn flash_errors(session: &Session, errors: &ValidationErrors) -> Result<()> {
    session.insert(ERRORS_KEY, errors).await
}

/// Take flashed validation errors, consuming them
pub async fn take_errors(session: &Session) -> Result<Option<ValidationErrors>> {
    session.remove(ERRORS_KEY).await
}

/// Flash the decoded input of a failed request for form re-rendering
pub async fn flash_old_input(session: &Session, input: &Value) -> Result<()> {
    session.insert(OLD_INPUT_KEY, input).await
}

/// Take the flashed old input, consuming it
pub async fn take_old_input(session: &Session) -> Result<Option<Value>> {
    session.remove(OLD_INPUT_KEY).await
}

/// Remember the page a browser is currently on
pub async fn remember_url(session: &Session, url: &str) -> Result<()> {
    session.insert(PREVIOUS_URL_KEY, url).await
}

/// Last remembered page
///
/// A plain read, not a flash: repeated failed submissions must keep
/// redirecting back to the same recorded page.
pub async fn previous_url(session: &Session) -> Result<Option<String>> {
    session.get(PREVIOUS_URL_KEY).await
}
