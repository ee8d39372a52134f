use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long the "analyse en cours" screen stays up.
pub const ANALYSIS_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Calculator,
    QuestionnaireStep1,
    QuestionnaireStep2,
    AnalyseEnCours,
    ContactConfirmation,
    NotFound,
}

impl Route {
    pub fn recognize(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Calculator,
            "/questionnaire-step-1" => Route::QuestionnaireStep1,
            "/questionnaire-step-2" => Route::QuestionnaireStep2,
            "/analyse-en-cours" => Route::AnalyseEnCours,
            "/contact-confirmation" => Route::ContactConfirmation,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Calculator => "/",
            Route::QuestionnaireStep1 => "/questionnaire-step-1",
            Route::QuestionnaireStep2 => "/questionnaire-step-2",
            Route::AnalyseEnCours => "/analyse-en-cours",
            Route::ContactConfirmation => "/contact-confirmation",
            Route::NotFound => "*",
        }
    }

    /// Forward button target.
    pub fn next(&self) -> Option<Route> {
        match self {
            Route::Calculator => Some(Route::QuestionnaireStep1),
            Route::QuestionnaireStep1 => Some(Route::QuestionnaireStep2),
            Route::QuestionnaireStep2 => Some(Route::AnalyseEnCours),
            Route::AnalyseEnCours => Some(Route::ContactConfirmation),
            // "new analysis" restarts the funnel
            Route::ContactConfirmation => Some(Route::Calculator),
            Route::NotFound => None,
        }
    }

    /// "Retour" button target.
    pub fn back(&self) -> Option<Route> {
        match self {
            Route::Calculator => None,
            Route::QuestionnaireStep1 => Some(Route::Calculator),
            Route::QuestionnaireStep2 => Some(Route::QuestionnaireStep1),
            Route::AnalyseEnCours => Some(Route::QuestionnaireStep2),
            Route::ContactConfirmation => Some(Route::AnalyseEnCours),
            Route::NotFound => Some(Route::Calculator),
        }
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            Route::QuestionnaireStep1 => Some(50),
            Route::QuestionnaireStep2 => Some(100),
            _ => None,
        }
    }
}

/// Automatic transition out of the loading screen. Dropping the timer
/// cancels it.
pub struct RedirectTimer {
    handle: JoinHandle<()>,
}

impl RedirectTimer {
    pub fn start(delay: Duration, navigate: mpsc::Sender<Route>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if navigate.send(Route::ContactConfirmation).await.is_err() {
                tracing::debug!("Redirect target went away before the timer fired");
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RedirectTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
