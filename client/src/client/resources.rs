//! Typed resource operations.
//!
//! Every other route in [`endpoints`] is reachable through
//! [`Client::fetch`] and [`Client::send`]; these wrappers pin down the
//! pagination defaults and input checks of the routes they cover.

use super::api_client::Client;
use super::NO_ARGS;
use crate::endpoints::{self, ReferenceData};
use crate::error::{ApiError, InputError};
use crate::query::{QueryFilter, QueryParams, DEFAULT_LIMIT, SMALL_DEFAULT_LIMIT};
use crate::response::QueryFilteredResult;
use crate::types::{
    ApiClient, AuditLogEntry, Household, HouseholdCreationRequestInput,
    HouseholdUpdateRequestInput, ValidIngredient,
};

impl Client {
    /// Fetches an API client by id.
    pub async fn get_api_client(&self, api_client_id: &str) -> Result<ApiClient, ApiError> {
        self.fetch(&endpoints::api_client::<ApiClient>(), &[api_client_id], &QueryParams::new())
            .await
    }

    /// Lists the current user's audit log, 20 entries per page by default.
    pub async fn get_audit_log_entries_for_user(
        &self,
        filter: Option<&QueryFilter>,
    ) -> Result<QueryFilteredResult<AuditLogEntry>, ApiError> {
        let query = QueryFilter::or_default(filter, SMALL_DEFAULT_LIMIT).to_params();
        self.fetch(&endpoints::audit_log_entries_for_user::<AuditLogEntry>(), NO_ARGS, &query)
            .await
    }

    /// Lists the households the current user belongs to.
    pub async fn get_households(
        &self,
        filter: Option<&QueryFilter>,
    ) -> Result<QueryFilteredResult<Household>, ApiError> {
        let query = QueryFilter::or_default(filter, DEFAULT_LIMIT).to_params();
        self.fetch(&endpoints::households::<Household>(), NO_ARGS, &query).await
    }

    pub async fn get_household(&self, household_id: &str) -> Result<Household, ApiError> {
        self.fetch(&endpoints::household::<Household>(), &[household_id], &QueryParams::new())
            .await
    }

    /// Fetches the session's active household.
    pub async fn get_current_household(&self) -> Result<Household, ApiError> {
        self.fetch(&endpoints::current_household::<Household>(), NO_ARGS, &QueryParams::new())
            .await
    }

    pub async fn create_household(
        &self,
        input: &HouseholdCreationRequestInput,
    ) -> Result<Household, ApiError> {
        self.send(&endpoints::create_household::<_, Household>(), NO_ARGS, Some(input))
            .await
    }

    pub async fn update_household(
        &self,
        household_id: &str,
        input: &HouseholdUpdateRequestInput,
    ) -> Result<Household, ApiError> {
        self.send(&endpoints::update_household::<_, Household>(), &[household_id], Some(input))
            .await
    }

    pub async fn archive_household(&self, household_id: &str) -> Result<(), ApiError> {
        self.fetch(
            &endpoints::archive_household(),
            &[household_id],
            &QueryParams::new(),
        )
        .await
    }

    /// Reports whether a valid ingredient exists, using `HEAD`.
    ///
    /// ## Errors
    ///
    /// A 404 is `Ok(false)`; every other failure is returned as is.
    pub async fn valid_ingredient_exists(
        &self,
        valid_ingredient_id: &str,
    ) -> Result<bool, ApiError> {
        let endpoint = endpoints::reference_exists(ReferenceData::ValidIngredients);
        self.fetch(&endpoint, &[valid_ingredient_id], &QueryParams::new())
            .await
    }

    pub async fn recipe_exists(&self, recipe_id: &str) -> Result<bool, ApiError> {
        self.fetch(&endpoints::recipe_exists(), &[recipe_id], &QueryParams::new())
            .await
    }

    /// Searches valid ingredients by name.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::EmptyQuery`] for an empty query, without
    /// sending anything.
    pub async fn search_valid_ingredients(
        &self,
        query: &str,
        filter: Option<&QueryFilter>,
    ) -> Result<QueryFilteredResult<ValidIngredient>, ApiError> {
        if query.trim().is_empty() {
            return Err(InputError::EmptyQuery.into());
        }
        let mut params = QueryFilter::or_default(filter, DEFAULT_LIMIT).to_params();
        params.set("q", query);
        self.fetch(
            &endpoints::reference_search::<ValidIngredient>(ReferenceData::ValidIngredients),
            NO_ARGS,
            &params,
        )
        .await
    }
}
