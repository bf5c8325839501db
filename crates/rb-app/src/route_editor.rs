//! Open/closed state of the route editing dialog.

use rb_core::RecordId;
use rb_schema::Route;
use rb_store::RecordStore;
use tracing::debug;

use crate::error::AppResult;
use crate::route_form::RouteForm;
use crate::route_service::{RouteSaveOutcome, save_route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    New,
    Editing(RecordId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteEditor {
    #[default]
    Closed,
    Open {
        mode: EditMode,
        form: RouteForm,
        /// Message of the last rejected submit.
        last_error: Option<String>,
    },
}

impl RouteEditor {
    pub fn open_new(&mut self) {
        *self = RouteEditor::Open {
            mode: EditMode::New,
            form: RouteForm::default(),
            last_error: None,
        };
    }

    pub fn open_edit(&mut self, route: &Route) {
        *self = RouteEditor::Open {
            mode: EditMode::Editing(route.id.clone()),
            form: RouteForm::from_route(route),
            last_error: None,
        };
    }

    pub fn cancel(&mut self) {
        *self = RouteEditor::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, RouteEditor::Open { .. })
    }

    pub fn form(&self) -> Option<&RouteForm> {
        match self {
            RouteEditor::Open { form, .. } => Some(form),
            RouteEditor::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut RouteForm> {
        match self {
            RouteEditor::Open { form, .. } => Some(form),
            RouteEditor::Closed => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            RouteEditor::Open { last_error, .. } => last_error.as_deref(),
            RouteEditor::Closed => None,
        }
    }

    /// Save the form. Closes on success; on failure the editor stays open
    /// with the error recorded and the form untouched.
    pub fn submit<S: RecordStore + ?Sized>(&mut self, store: &S) -> AppResult<RouteSaveOutcome> {
        let RouteEditor::Open {
            mode,
            form,
            last_error,
        } = self
        else {
            return Err(crate::AppError::InvalidInput(
                "route editor is not open".to_string(),
            ));
        };

        let editing = match mode {
            EditMode::New => None,
            EditMode::Editing(id) => Some(&*id),
        };

        match save_route(store, form, editing) {
            Ok(outcome) => {
                *self = RouteEditor::Closed;
                Ok(outcome)
            }
            Err(err) => {
                debug!(error = %err, "route submit rejected");
                *last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
