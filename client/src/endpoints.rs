//! The API's endpoint catalogue.
//!
//! Each function returns the [`Endpoint`] for one route. Payload and record
//! types are generic, so the catalogue fixes only the route, the method, and
//! the response shape; callers choose the concrete types. The typed
//! operations on [`Client`](crate::Client) are built on these.
//!
//! ```
//! use mealplan_client::endpoints;
//!
//! let endpoint = endpoints::meal_plan_option::<serde_json::Value>();
//! assert_eq!(
//!     endpoint.full_path(),
//!     "/api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options/{meal_plan_option_id}"
//! );
//! ```

use crate::endpoint::{BadRequestKind, Endpoint};
use crate::method::RestMethod;
use crate::response::{Accepted, Empty, Exists, Item, Page};

fn versioned<I, O>(id: &str, method: RestMethod, path: &str) -> Endpoint<I, O> {
    Endpoint::builder().id(id).method(method).path(path).build()
}

fn versionless<I, O>(id: &str, method: RestMethod, path: &str) -> Endpoint<I, O> {
    Endpoint::builder()
        .id(id)
        .method(method)
        .path(path)
        .versionless()
        .build()
}

fn public<I, O>(id: &str, method: RestMethod, path: &str) -> Endpoint<I, O> {
    Endpoint::builder()
        .id(id)
        .method(method)
        .path(path)
        .versionless()
        .without_auth()
        .build()
}

// --- Sessions ---------------------------------------------------------------

/// `POST /users/login`
pub fn login<I>() -> Endpoint<I, Empty> {
    public("login", RestMethod::Post, "users/login")
}

/// `POST /users/logout`
pub fn logout() -> Endpoint<(), Accepted> {
    versionless("logout", RestMethod::Post, "users/logout")
}

// --- Password and TOTP ------------------------------------------------------

/// `PUT /api/v1/users/password/new`
pub fn change_password<I>() -> Endpoint<I, Accepted> {
    versioned("change_password", RestMethod::Put, "users/password/new")
}

/// `POST /api/v1/users/totp_secret/new`
pub fn cycle_two_factor_secret<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "cycle_two_factor_secret",
        RestMethod::Post,
        "users/totp_secret/new",
    )
}

/// `POST /users/totp_secret/verify`; a 400 means the token was rejected.
pub fn verify_totp_secret<I>() -> Endpoint<I, Accepted> {
    Endpoint::builder()
        .id("verify_totp_secret")
        .method(RestMethod::Post)
        .path("users/totp_secret/verify")
        .versionless()
        .without_auth()
        .on_bad_request(BadRequestKind::InvalidTotpToken)
        .build()
}

/// `POST /users/password/reset`
pub fn request_password_reset_token<I>() -> Endpoint<I, Accepted> {
    public(
        "request_password_reset_token",
        RestMethod::Post,
        "users/password/reset",
    )
}

/// `POST /users/password/reset/redeem`
pub fn redeem_password_reset_token<I>() -> Endpoint<I, Accepted> {
    public(
        "redeem_password_reset_token",
        RestMethod::Post,
        "users/password/reset/redeem",
    )
}

/// `POST /api/v1/users/household/select`
pub fn switch_active_household<I>() -> Endpoint<I, Empty> {
    versioned(
        "switch_active_household",
        RestMethod::Post,
        "users/household/select",
    )
}

// --- Health and streams -----------------------------------------------------

/// `GET /_meta_/ready`
pub fn readiness() -> Endpoint<(), Empty> {
    public("readiness", RestMethod::Get, "_meta_/ready")
}

/// `GET /events`, the server-sent event stream.
pub fn event_stream() -> Endpoint<(), Empty> {
    versionless("event_stream", RestMethod::Get, "events")
}

// --- Households -------------------------------------------------------------

/// `GET /api/v1/households`
pub fn households<T>() -> Endpoint<(), Page<T>> {
    versioned("get_households", RestMethod::Get, "households")
}

/// `POST /api/v1/households`
pub fn create_household<I, T>() -> Endpoint<I, Item<T>> {
    versioned("create_household", RestMethod::Post, "households")
}

/// `GET /api/v1/households/current`
pub fn current_household<T>() -> Endpoint<(), Item<T>> {
    versioned("get_current_household", RestMethod::Get, "households/current")
}

/// `GET /api/v1/households/{household_id}`
pub fn household<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_household",
        RestMethod::Get,
        "households/{household_id}",
    )
}

/// `PUT /api/v1/households/{household_id}`
pub fn update_household<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "update_household",
        RestMethod::Put,
        "households/{household_id}",
    )
}

/// `DELETE /api/v1/households/{household_id}`
pub fn archive_household() -> Endpoint<(), Empty> {
    versioned(
        "archive_household",
        RestMethod::Delete,
        "households/{household_id}",
    )
}

/// `POST /api/v1/households/{household_id}/default`
pub fn set_default_household() -> Endpoint<(), Empty> {
    versioned(
        "set_default_household",
        RestMethod::Post,
        "households/{household_id}/default",
    )
}

/// `POST /api/v1/households/{household_id}/invite`
pub fn invite_household_member<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "invite_household_member",
        RestMethod::Post,
        "households/{household_id}/invite",
    )
}

/// `DELETE /api/v1/households/{household_id}/members/{user_id}`
pub fn remove_household_member() -> Endpoint<(), Empty> {
    versioned(
        "remove_household_member",
        RestMethod::Delete,
        "households/{household_id}/members/{user_id}",
    )
}

/// `PATCH /api/v1/households/{household_id}/members/{user_id}/permissions`
pub fn modify_member_permissions<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "modify_member_permissions",
        RestMethod::Patch,
        "households/{household_id}/members/{user_id}/permissions",
    )
}

/// `POST /api/v1/households/{household_id}/transfer`
pub fn transfer_household_ownership<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "transfer_household_ownership",
        RestMethod::Post,
        "households/{household_id}/transfer",
    )
}

// --- Meal plans -------------------------------------------------------------

/// `GET /api/v1/meal_plans`
pub fn meal_plans<T>() -> Endpoint<(), Page<T>> {
    versioned("get_meal_plans", RestMethod::Get, "meal_plans")
}

/// `POST /api/v1/meal_plans`
pub fn create_meal_plan<I, T>() -> Endpoint<I, Item<T>> {
    versioned("create_meal_plan", RestMethod::Post, "meal_plans")
}

/// `GET /api/v1/meal_plans/{meal_plan_id}`
pub fn meal_plan<T>() -> Endpoint<(), Item<T>> {
    versioned("get_meal_plan", RestMethod::Get, "meal_plans/{meal_plan_id}")
}

/// `PUT /api/v1/meal_plans/{meal_plan_id}`
pub fn update_meal_plan<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "update_meal_plan",
        RestMethod::Put,
        "meal_plans/{meal_plan_id}",
    )
}

/// `DELETE /api/v1/meal_plans/{meal_plan_id}`
pub fn archive_meal_plan() -> Endpoint<(), Empty> {
    versioned(
        "archive_meal_plan",
        RestMethod::Delete,
        "meal_plans/{meal_plan_id}",
    )
}

/// `POST /api/v1/meal_plans/{meal_plan_id}/finalize`
pub fn finalize_meal_plan<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "finalize_meal_plan",
        RestMethod::Post,
        "meal_plans/{meal_plan_id}/finalize",
    )
}

/// `GET /api/v1/meal_plans/{meal_plan_id}/events`
pub fn meal_plan_events<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_meal_plan_events",
        RestMethod::Get,
        "meal_plans/{meal_plan_id}/events",
    )
}

/// `POST /api/v1/meal_plans/{meal_plan_id}/events`
pub fn create_meal_plan_event<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "create_meal_plan_event",
        RestMethod::Post,
        "meal_plans/{meal_plan_id}/events",
    )
}

/// `GET /api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}`
pub fn meal_plan_event<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_meal_plan_event",
        RestMethod::Get,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}",
    )
}

/// `PUT /api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}`
pub fn update_meal_plan_event<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "update_meal_plan_event",
        RestMethod::Put,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}",
    )
}

/// `DELETE /api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}`
pub fn archive_meal_plan_event() -> Endpoint<(), Empty> {
    versioned(
        "archive_meal_plan_event",
        RestMethod::Delete,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}",
    )
}

/// `GET .../events/{meal_plan_event_id}/options`
pub fn meal_plan_options<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_meal_plan_options",
        RestMethod::Get,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options",
    )
}

/// `POST .../events/{meal_plan_event_id}/options`
pub fn create_meal_plan_option<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "create_meal_plan_option",
        RestMethod::Post,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options",
    )
}

/// `GET .../events/{meal_plan_event_id}/options/{meal_plan_option_id}`
pub fn meal_plan_option<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_meal_plan_option",
        RestMethod::Get,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options/{meal_plan_option_id}",
    )
}

/// `PUT .../events/{meal_plan_event_id}/options/{meal_plan_option_id}`
pub fn update_meal_plan_option<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "update_meal_plan_option",
        RestMethod::Put,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options/{meal_plan_option_id}",
    )
}

/// `DELETE .../events/{meal_plan_event_id}/options/{meal_plan_option_id}`
pub fn archive_meal_plan_option() -> Endpoint<(), Empty> {
    versioned(
        "archive_meal_plan_option",
        RestMethod::Delete,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/options/{meal_plan_option_id}",
    )
}

/// `POST /api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/vote`
pub fn vote_on_meal_plan<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "vote_on_meal_plan",
        RestMethod::Post,
        "meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/vote",
    )
}

// --- Recipes ----------------------------------------------------------------

/// `GET /api/v1/recipes`
pub fn recipes<T>() -> Endpoint<(), Page<T>> {
    versioned("get_recipes", RestMethod::Get, "recipes")
}

/// `GET /api/v1/recipes/search`
pub fn search_recipes<T>() -> Endpoint<(), Page<T>> {
    versioned("search_recipes", RestMethod::Get, "recipes/search")
}

/// `POST /api/v1/recipes`
pub fn create_recipe<I, T>() -> Endpoint<I, Item<T>> {
    versioned("create_recipe", RestMethod::Post, "recipes")
}

/// `GET /api/v1/recipes/{recipe_id}`
pub fn recipe<T>() -> Endpoint<(), Item<T>> {
    versioned("get_recipe", RestMethod::Get, "recipes/{recipe_id}")
}

/// `HEAD /api/v1/recipes/{recipe_id}`
pub fn recipe_exists() -> Endpoint<(), Exists> {
    versioned("recipe_exists", RestMethod::Head, "recipes/{recipe_id}")
}

/// `PUT /api/v1/recipes/{recipe_id}`
pub fn update_recipe<I, T>() -> Endpoint<I, Item<T>> {
    versioned("update_recipe", RestMethod::Put, "recipes/{recipe_id}")
}

/// `DELETE /api/v1/recipes/{recipe_id}`
pub fn archive_recipe() -> Endpoint<(), Empty> {
    versioned("archive_recipe", RestMethod::Delete, "recipes/{recipe_id}")
}

/// `GET /api/v1/recipes/{recipe_id}/steps`
pub fn recipe_steps<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_recipe_steps",
        RestMethod::Get,
        "recipes/{recipe_id}/steps",
    )
}

/// `POST /api/v1/recipes/{recipe_id}/steps`
pub fn create_recipe_step<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "create_recipe_step",
        RestMethod::Post,
        "recipes/{recipe_id}/steps",
    )
}

/// `GET /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}`
pub fn recipe_step<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_recipe_step",
        RestMethod::Get,
        "recipes/{recipe_id}/steps/{recipe_step_id}",
    )
}

/// `PUT /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}`
pub fn update_recipe_step<I, T>() -> Endpoint<I, Item<T>> {
    versioned(
        "update_recipe_step",
        RestMethod::Put,
        "recipes/{recipe_id}/steps/{recipe_step_id}",
    )
}

/// `DELETE /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}`
pub fn archive_recipe_step() -> Endpoint<(), Empty> {
    versioned(
        "archive_recipe_step",
        RestMethod::Delete,
        "recipes/{recipe_id}/steps/{recipe_step_id}",
    )
}

/// Child collections nested under a recipe step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RecipeStepChild {
    Ingredients,
    Products,
    Instruments,
    Vessels,
    CompletionConditions,
}

/// `GET /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}/<child>`
pub fn recipe_step_children<T>(child: RecipeStepChild) -> Endpoint<(), Page<T>> {
    versioned(
        &format!("get_recipe_step_{child}"),
        RestMethod::Get,
        &format!("recipes/{{recipe_id}}/steps/{{recipe_step_id}}/{child}"),
    )
}

/// `POST /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}/<child>`
pub fn create_recipe_step_child<I, T>(child: RecipeStepChild) -> Endpoint<I, Item<T>> {
    versioned(
        &format!("create_recipe_step_{child}"),
        RestMethod::Post,
        &format!("recipes/{{recipe_id}}/steps/{{recipe_step_id}}/{child}"),
    )
}

/// `GET /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}/<child>/{child_id}`
pub fn recipe_step_child<T>(child: RecipeStepChild) -> Endpoint<(), Item<T>> {
    versioned(
        &format!("get_recipe_step_{child}_item"),
        RestMethod::Get,
        &format!("recipes/{{recipe_id}}/steps/{{recipe_step_id}}/{child}/{{child_id}}"),
    )
}

/// `DELETE /api/v1/recipes/{recipe_id}/steps/{recipe_step_id}/<child>/{child_id}`
pub fn archive_recipe_step_child(child: RecipeStepChild) -> Endpoint<(), Empty> {
    versioned(
        &format!("archive_recipe_step_{child}_item"),
        RestMethod::Delete,
        &format!("recipes/{{recipe_id}}/steps/{{recipe_step_id}}/{child}/{{child_id}}"),
    )
}

// --- Reference data ---------------------------------------------------------

/// Reference-data resource families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ReferenceData {
    ValidIngredients,
    ValidPreparations,
    ValidVessels,
    ValidInstruments,
    ValidMeasurementUnits,
    ValidIngredientStates,
}

/// `GET /api/v1/<kind>`
pub fn reference_list<T>(kind: ReferenceData) -> Endpoint<(), Page<T>> {
    versioned(&format!("get_{kind}"), RestMethod::Get, &kind.to_string())
}

/// `GET /api/v1/<kind>/search`
pub fn reference_search<T>(kind: ReferenceData) -> Endpoint<(), Page<T>> {
    versioned(
        &format!("search_{kind}"),
        RestMethod::Get,
        &format!("{kind}/search"),
    )
}

/// `POST /api/v1/<kind>`
pub fn create_reference<I, T>(kind: ReferenceData) -> Endpoint<I, Item<T>> {
    versioned(&format!("create_{kind}"), RestMethod::Post, &kind.to_string())
}

/// `GET /api/v1/<kind>/{id}`
pub fn reference_item<T>(kind: ReferenceData) -> Endpoint<(), Item<T>> {
    versioned(
        &format!("get_{kind}_item"),
        RestMethod::Get,
        &format!("{kind}/{{id}}"),
    )
}

/// `HEAD /api/v1/<kind>/{id}`
pub fn reference_exists(kind: ReferenceData) -> Endpoint<(), Exists> {
    versioned(
        &format!("{kind}_item_exists"),
        RestMethod::Head,
        &format!("{kind}/{{id}}"),
    )
}

/// `PUT /api/v1/<kind>/{id}`
pub fn update_reference<I, T>(kind: ReferenceData) -> Endpoint<I, Item<T>> {
    versioned(
        &format!("update_{kind}_item"),
        RestMethod::Put,
        &format!("{kind}/{{id}}"),
    )
}

/// `DELETE /api/v1/<kind>/{id}`
pub fn archive_reference(kind: ReferenceData) -> Endpoint<(), Empty> {
    versioned(
        &format!("archive_{kind}_item"),
        RestMethod::Delete,
        &format!("{kind}/{{id}}"),
    )
}

/// `GET /api/v1/valid_ingredient_preparations/by_ingredient/{valid_ingredient_id}`
pub fn valid_ingredient_preparations_by_ingredient<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_valid_ingredient_preparations_by_ingredient",
        RestMethod::Get,
        "valid_ingredient_preparations/by_ingredient/{valid_ingredient_id}",
    )
}

/// `GET /api/v1/valid_ingredient_preparations/by_preparation/{valid_preparation_id}`
pub fn valid_ingredient_preparations_by_preparation<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_valid_ingredient_preparations_by_preparation",
        RestMethod::Get,
        "valid_ingredient_preparations/by_preparation/{valid_preparation_id}",
    )
}

/// `GET /api/v1/valid_preparation_vessels/by_preparation/{valid_preparation_id}`
pub fn valid_preparation_vessels_by_preparation<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_valid_preparation_vessels_by_preparation",
        RestMethod::Get,
        "valid_preparation_vessels/by_preparation/{valid_preparation_id}",
    )
}

/// `GET /api/v1/valid_preparation_vessels/by_vessel/{valid_vessel_id}`
pub fn valid_preparation_vessels_by_vessel<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_valid_preparation_vessels_by_vessel",
        RestMethod::Get,
        "valid_preparation_vessels/by_vessel/{valid_vessel_id}",
    )
}

// --- Accounts ---------------------------------------------------------------

/// `GET /api/v1/api_clients`
pub fn api_clients<T>() -> Endpoint<(), Page<T>> {
    versioned("get_api_clients", RestMethod::Get, "api_clients")
}

/// `GET /api/v1/api_clients/{api_client_id}`
pub fn api_client<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_api_client",
        RestMethod::Get,
        "api_clients/{api_client_id}",
    )
}

/// `DELETE /api/v1/api_clients/{api_client_id}`
pub fn archive_api_client() -> Endpoint<(), Empty> {
    versioned(
        "archive_api_client",
        RestMethod::Delete,
        "api_clients/{api_client_id}",
    )
}

/// `GET /api/v1/audit_log_entries/for_user`
pub fn audit_log_entries_for_user<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_audit_log_entries_for_user",
        RestMethod::Get,
        "audit_log_entries/for_user",
    )
}

/// `GET /api/v1/audit_log_entries/for_household`
pub fn audit_log_entries_for_household<T>() -> Endpoint<(), Page<T>> {
    versioned(
        "get_audit_log_entries_for_household",
        RestMethod::Get,
        "audit_log_entries/for_household",
    )
}

/// `GET /api/v1/audit_log_entries/{audit_log_entry_id}`
pub fn audit_log_entry<T>() -> Endpoint<(), Item<T>> {
    versioned(
        "get_audit_log_entry",
        RestMethod::Get,
        "audit_log_entries/{audit_log_entry_id}",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use strum::IntoEnumIterator;

    #[test]
    fn test_auth_endpoints_are_versionless() {
        assert_eq!(login::<()>().full_path(), "/users/login");
        assert_eq!(logout().full_path(), "/users/logout");
        assert_eq!(
            verify_totp_secret::<()>().full_path(),
            "/users/totp_secret/verify"
        );
        assert_eq!(
            redeem_password_reset_token::<()>().full_path(),
            "/users/password/reset/redeem"
        );
        assert!(!login::<()>().requires_auth());
        assert!(logout().requires_auth());
    }

    #[test]
    fn test_password_and_totp_rotation_are_versioned() {
        let endpoint = change_password::<()>();
        assert_eq!(endpoint.method(), RestMethod::Put);
        assert_eq!(endpoint.full_path(), "/api/v1/users/password/new");
        assert_eq!(
            cycle_two_factor_secret::<(), Value>().full_path(),
            "/api/v1/users/totp_secret/new"
        );
    }

    #[test]
    fn test_totp_verification_maps_bad_request() {
        assert_eq!(
            verify_totp_secret::<()>().bad_request_kind(),
            BadRequestKind::InvalidTotpToken
        );
        assert_eq!(
            change_password::<()>().bad_request_kind(),
            BadRequestKind::Generic
        );
    }

    #[test]
    fn test_health_endpoint() {
        let endpoint = readiness();
        assert_eq!(endpoint.full_path(), "/_meta_/ready");
        assert!(!endpoint.requires_auth());
    }

    #[test]
    fn test_household_member_paths() {
        let endpoint = modify_member_permissions::<(), Value>();
        assert_eq!(endpoint.method(), RestMethod::Patch);
        assert_eq!(endpoint.path_params(), vec!["household_id", "user_id"]);
        assert_eq!(
            endpoint.segments(&["h1", "u1"]).unwrap(),
            vec!["households", "h1", "members", "u1", "permissions"]
        );
    }

    #[test]
    fn test_vote_path() {
        assert_eq!(
            vote_on_meal_plan::<(), Value>().full_path(),
            "/api/v1/meal_plans/{meal_plan_id}/events/{meal_plan_event_id}/vote"
        );
    }

    #[test]
    fn test_recipe_step_children() {
        let endpoint = recipe_step_children::<Value>(RecipeStepChild::CompletionConditions);
        assert_eq!(
            endpoint.full_path(),
            "/api/v1/recipes/{recipe_id}/steps/{recipe_step_id}/completion_conditions"
        );
        for child in RecipeStepChild::iter() {
            assert_eq!(recipe_step_child::<Value>(child).path_params().len(), 3);
        }
    }

    #[test]
    fn test_reference_data_paths() {
        assert_eq!(
            reference_search::<Value>(ReferenceData::ValidIngredients).full_path(),
            "/api/v1/valid_ingredients/search"
        );
        assert_eq!(
            reference_item::<Value>(ReferenceData::ValidVessels).full_path(),
            "/api/v1/valid_vessels/{id}"
        );
        for kind in ReferenceData::iter() {
            assert!(reference_list::<Value>(kind).requires_auth());
            assert_eq!(reference_exists(kind).method(), RestMethod::Head);
        }
        assert_eq!(
            reference_exists(ReferenceData::ValidIngredients).full_path(),
            "/api/v1/valid_ingredients/{id}"
        );
        assert_eq!(recipe_exists().full_path(), "/api/v1/recipes/{recipe_id}");
    }
}
