//! Category creation modal and endpoint.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::Session,
    category::domain::CategoryFormData,
    dashboard::{DashboardState, dashboard_update_response, mutation_error_response},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, labelled_input, modal},
};

/// Render the modal for adding a category.
pub async fn get_new_category_modal() -> Response {
    new_category_modal().into_response()
}

fn new_category_modal() -> Markup {
    let form = html! {
        form
            hx-post=(endpoints::CATEGORIES_API)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (labelled_input(
                "name",
                "Category Name",
                "text",
                "",
                "e.g., Food, Transport, Entertainment",
            ))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
        }
    };

    modal("Add New Category", &form)
}

/// Handle category creation form submission.
///
/// Blank names are rejected before the API is contacted.
pub async fn create_category_endpoint(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Form(new_category): Form<CategoryFormData>,
) -> Response {
    match state
        .data
        .create_category(&state.api, &session, &new_category.name)
        .await
    {
        Ok(category) => {
            tracing::info!("Created category {} ({})", category.name, category.id);
            dashboard_update_response(&state, &session, "Category added!")
        }
        Err(error) => mutation_error_response(&state.sessions, &session, error),
    }
}
