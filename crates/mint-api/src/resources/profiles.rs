//! Profiles API endpoints: discovery, own account, other users, sync

use chrono::{DateTime, Utc};
use mint_transport::HttpRequest;
use serde_json::Value;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

use super::{ACCESS_TOKEN_HEADER, read, require_id};
use crate::{
    client::Client,
    error::{Error, Result},
    observability::log_precondition_failed,
    session::Credentials,
    types::{DataList, Profile},
};

// Image size hints the official app sends
const PICTURE_WIDTH: u32 = 640;
const NEARBY_PICTURE_HEIGHT: u32 = 510;
const PROFILE_PICTURE_HEIGHT: u32 = 558;
const AVATAR_SIZE: u32 = 288;
const INTEREST_AVATAR_SIZE: u32 = 170;
const SPOTIFY_AVATAR_SIZE: u32 = 170;
const SCALE: u32 = 1;

/// Profiles API resource.
#[derive(Clone, Copy)]
pub struct Profiles<'a> {
    client: &'a Client,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Profiles<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client, cancel: None }
    }

    /// Abort calls made through this view once `token` fires.
    pub fn cancellable(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Profiles near a location.
    ///
    /// Fetches the nearby and the recently active lists concurrently and
    /// merges them with [`merge_by_id`]. Fails if either fetch fails.
    pub async fn recommendations(&self, latitude: f64, longitude: f64) -> Result<Vec<Profile>> {
        validate_coordinates(latitude, longitude)?;
        let credentials = self.client.session().require()?;

        let nearby = self.nearby_request(&credentials, "/v3/me/nearby", latitude, longitude);
        let active = self.nearby_request(&credentials, "/v3/me/nearby?active", latitude, longitude);

        let (nearby, active) = tokio::try_join!(self.fetch_list(nearby), self.fetch_list(active))?;

        Ok(merge_by_id(nearby, active))
    }

    /// The authorized user's own account.
    pub async fn account(&self) -> Result<Value> {
        let credentials = self.client.session().require()?;

        let request = with_profile_sizes(
            HttpRequest::get(self.client.url("/v5/me"))
                .with_header(ACCESS_TOKEN_HEADER, credentials.access_token()),
        );

        read(self.client, request, self.cancel).await
    }

    /// Another user's profile, or `None` if the backend returns none.
    pub async fn user(&self, user_id: &str) -> Result<Option<Profile>> {
        let user_id = require_id("user", "user id", user_id)?;
        let credentials = self.client.session().require()?;

        let request = HttpRequest::get(self.client.url("/v3/profiles"))
            .with_header(ACCESS_TOKEN_HEADER, credentials.access_token())
            .with_query("ids", user_id)
            .with_query("picture_width", PICTURE_WIDTH)
            .with_query("picture_height", PROFILE_PICTURE_HEIGHT)
            .with_query("avatar_size", AVATAR_SIZE)
            .with_query("scale", SCALE);

        Ok(self.fetch_list(request).await?.into_iter().next())
    }

    /// Everything that changed since `since`, or a full sync without it.
    ///
    /// `since` is sent as Unix milliseconds.
    pub async fn updates(&self, since: Option<DateTime<Utc>>) -> Result<Value> {
        let credentials = self.client.session().require()?;

        let mut request = HttpRequest::get(self.client.url("/v5/me/sync"))
            .with_header(ACCESS_TOKEN_HEADER, credentials.access_token());
        if let Some(since) = since {
            request = request.with_query("t", since.timestamp_millis());
        }

        read(self.client, with_profile_sizes(request), self.cancel).await
    }

    fn nearby_request(&self, credentials: &Credentials, path: &str, latitude: f64, longitude: f64) -> HttpRequest {
        HttpRequest::get(self.client.url(path))
            .with_header(ACCESS_TOKEN_HEADER, credentials.access_token())
            .with_query("lat", latitude)
            .with_query("lng", longitude)
            .with_query("picture_width", PICTURE_WIDTH)
            .with_query("picture_height", NEARBY_PICTURE_HEIGHT)
            .with_query("avatar_size", AVATAR_SIZE)
            .with_query("scale", SCALE)
    }

    async fn fetch_list(&self, request: HttpRequest) -> Result<Vec<Profile>> {
        let body = read(self.client, request, self.cancel).await?;
        let list: DataList<Profile> = serde_json::from_value(body)?;
        Ok(list.into_items())
    }
}

fn with_profile_sizes(request: HttpRequest) -> HttpRequest {
    request
        .with_query("picture_width", PICTURE_WIDTH)
        .with_query("picture_height", PROFILE_PICTURE_HEIGHT)
        .with_query("avatar_size", AVATAR_SIZE)
        .with_query("interest_avatar_size", INTEREST_AVATAR_SIZE)
        .with_query("spotify_avatar_size", SPOTIFY_AVATAR_SIZE)
        .with_query("scale", SCALE)
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);

    if !valid {
        log_precondition_failed("recommendations", "coordinates out of range");
        return Err(Error::invalid_argument(format!(
            "invalid coordinates ({latitude}, {longitude})"
        )));
    }
    Ok(())
}

/// Concatenate two profile lists, keeping only the first profile seen for
/// each id.
///
/// Order is that of `first` followed by the profiles of `second` whose ids
/// were not seen before.
///
/// ```rust
/// use mint_api::{Profile, resources::merge_by_id};
///
/// let profile = |id: &str| Profile { id: id.into(), extra: Default::default() };
///
/// let merged = merge_by_id(
///     vec![profile("1"), profile("2")],
///     vec![profile("2"), profile("3")],
/// );
/// let ids: Vec<_> = merged.iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, ["1", "2", "3"]);
/// ```
pub fn merge_by_id(first: Vec<Profile>, second: Vec<Profile>) -> Vec<Profile> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|profile| seen.insert(profile.id.clone()))
        .collect()
}
