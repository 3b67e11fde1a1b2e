//! Git hook lifecycle management and the commit event producer.
//!
//! The installer owns a single managed script per hook path and is
//! careful never to destroy unrelated user content: foreign hooks are
//! backed up and chained, and uninstall refuses to touch anything it
//! does not recognize. The producer turns "a commit just happened" into
//! exactly one idempotent event.

pub mod installer;
pub mod post_commit;
mod script;

pub use installer::{
    HookInspection, InstallOptions, InstallReport, UninstallOutcome, inspect_hook, install_hook,
    uninstall_hook,
};
pub use post_commit::{commit_event, record_post_commit};
