// Wizard core: onboarding -> upload -> analyze -> advice -> plan.
// `machine` holds the pure state transitions, `controller` runs them against
// the store and the remote collaborators, `persist` maps state to store keys.

use thiserror::Error;

use crate::collaborators::RemoteError;
use crate::store::StoreError;

pub mod completion;
pub mod controller;
pub mod handlers;
pub mod machine;
pub mod persist;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use completion::CompletionSet;
pub use controller::WizardController;
pub use machine::Operation;
pub use view::WizardView;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(String),

    #[error("Please select a résumé file first")]
    NoFileSelected,

    #[error("Unsupported file type '{0}'. Please use PDF or DOCX.")]
    UnsupportedFileType(String),

    #[error("No résumé text to analyze")]
    EmptyInput,

    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),

    #[error("{reason}")]
    OutOfScope { reason: String },

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("Another {0} request is already in progress")]
    Busy(Operation),

    #[error("The wizard was reset while {0} was in progress")]
    Superseded(Operation),

    #[error("Reset must be explicitly confirmed")]
    ConfirmationRequired,

    #[error("No learning plan has been generated yet")]
    NoPlan,

    #[error("Week {0} is not part of the current plan")]
    UnknownWeek(u32),

    #[error("Could not save progress: {0}")]
    Store(#[from] StoreError),
}
