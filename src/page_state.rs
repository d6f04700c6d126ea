//! Page Lifecycle
//!
//! Every data page moves Loading -> Ready | Error and back to Loading on
//! refresh. Mutations are followed by one full re-fetch, never by local
//! patching of the displayed list.

use std::future::Future;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    /// `previous` keeps the last good data visible during a refresh
    Loading { previous: Option<T> },
    Ready(T),
    Error { message: String, previous: Option<T> },
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading { previous: None }
    }
}

impl<T> PageState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_data(self) -> Option<T> {
        match self {
            PageState::Loading { previous } | PageState::Error { previous, .. } => previous,
            PageState::Ready(data) => Some(data),
        }
    }

    pub fn begin_reload(self) -> Self {
        PageState::Loading { previous: self.take_data() }
    }

    /// Apply a fetch outcome. A cancelled fetch leaves the state untouched.
    pub fn resolve(self, result: ApiResult<T>, fallback: &str) -> Self {
        match result {
            Ok(data) => PageState::Ready(data),
            Err(ApiError::Cancelled) => self,
            Err(e) => PageState::Error {
                message: e.user_message(fallback),
                previous: self.take_data(),
            },
        }
    }

    /// Record a failed mutation while keeping the current data
    pub fn fail(self, error: &ApiError, fallback: &str) -> Self {
        if error.is_cancelled() {
            return self;
        }
        PageState::Error {
            message: error.user_message(fallback),
            previous: self.take_data(),
        }
    }

    pub fn dismiss_error(self) -> Self {
        match self {
            PageState::Error { previous: Some(data), .. } => PageState::Ready(data),
            PageState::Error { previous: None, .. } => PageState::Loading { previous: None },
            other => other,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            PageState::Loading { previous } | PageState::Error { previous, .. } => previous.as_ref(),
            PageState::Ready(data) => Some(data),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading { .. })
    }
}

impl<T> PageState<Vec<T>> {
    /// Rows currently shown; empty while nothing has loaded
    pub fn items(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self) -> usize {
        self.items().len()
    }
}

/// Run `mutate`, then `reload` exactly once. A failed mutation returns its
/// error and skips the reload.
pub async fn mutate_then_reload<M, T, Mut, Reload, ReloadFut>(mutate: Mut, reload: Reload) -> ApiResult<T>
where
    Mut: Future<Output = ApiResult<M>>,
    Reload: FnOnce() -> ReloadFut,
    ReloadFut: Future<Output = ApiResult<T>>,
{
    mutate.await?;
    reload().await
}

/// Two-step arming for destructive actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmGate {
    armed: bool,
}

impl ConfirmGate {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// True at most once per arming
    pub fn confirm(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_initial_state_is_loading() {
        let state: PageState<Vec<u8>> = PageState::new();
        assert!(state.is_loading());
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn test_transitions() {
        let state = PageState::new().resolve(Ok(vec![1, 2, 3]), "x");
        assert_eq!(state, PageState::Ready(vec![1, 2, 3]));
        assert_eq!(state.count(), 3);

        let state = state.begin_reload();
        assert!(state.is_loading());
        assert_eq!(state.count(), 3);

        let state = state.resolve(Err(ApiError::Network("down".into())), "Error al cargar tareas");
        assert_eq!(state.error(), Some("Error de conexión. Verifica que el backend esté ejecutándose."));
        assert_eq!(state.items(), &[1, 2, 3]);

        let state = state.dismiss_error();
        assert_eq!(state, PageState::Ready(vec![1, 2, 3]));
    }

    #[test]
    fn test_first_load_error_has_no_data() {
        let state: PageState<Vec<u8>> = PageState::new().resolve(Err(ApiError::Parse("eof".into())), "Error al cargar rutas");
        assert_eq!(state.error(), Some("Error al cargar rutas"));
        assert!(state.data().is_none());
    }

    #[test]
    fn test_cancelled_fetch_is_ignored() {
        let state = PageState::Ready(vec![7]).begin_reload();
        let state = state.resolve(Err(ApiError::Cancelled), "x");
        assert_eq!(state, PageState::Loading { previous: Some(vec![7]) });
    }

    #[tokio::test]
    async fn test_successful_mutation_reloads_once() {
        let reloads = Cell::new(0);
        let result = mutate_then_reload(async { Ok::<_, ApiError>(()) }, || {
            reloads.set(reloads.get() + 1);
            async { Ok::<_, ApiError>(vec!["nueva"]) }
        })
        .await;

        assert_eq!(result, Ok(vec!["nueva"]));
        assert_eq!(reloads.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_skips_reload() {
        let reloads = Cell::new(0);
        let result: ApiResult<Vec<u8>> = mutate_then_reload(
            async { Err::<(), _>(ApiError::Http { status: 400, message: "Inválido".into() }) },
            || {
                reloads.set(reloads.get() + 1);
                async { Ok(vec![]) }
            },
        )
        .await;

        let state = PageState::Ready(vec![1u8]).fail(&result.unwrap_err(), "Error al eliminar");
        assert_eq!(reloads.get(), 0);
        assert_eq!(state.error(), Some("Inválido"));
        assert_eq!(state.items(), &[1]);
    }

    #[test]
    fn test_confirm_requires_arming() {
        let mut gate = ConfirmGate::default();
        assert!(!gate.confirm());
        gate.arm();
        assert!(gate.is_armed());
        assert!(gate.confirm());
        assert!(!gate.confirm());
        gate.arm();
        gate.disarm();
        assert!(!gate.confirm());
    }
}
