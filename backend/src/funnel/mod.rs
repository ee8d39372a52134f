//! Client-side state of the lead funnel: calculator and its detail modal,
//! the two questionnaire steps, the loading screen redirect and the
//! contact capture.

pub mod calculator;
pub mod contact;
pub mod counter;
pub mod detail;
pub mod questionnaire;
pub mod routes;
pub mod session;
pub mod slider;
