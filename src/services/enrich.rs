// SPDX-License-Identifier: MIT

//! Itinerary enrichment stages.
//!
//! Two capped fan-out passes over the draft itinerary:
//! 1. Geocoding: every day's city and every attraction name, all
//!    concurrent, each lookup isolated from its siblings.
//! 2. Lodging: one token exchange, then a concurrent per-day hotel
//!    search for every day except the last.
//!
//! Neither stage can fail the pipeline. Failed lookups degrade the data
//! (a missing coordinate, a `NotFound` hotel marker) and are logged.

use crate::models::{DayPlan, HotelResult, Itinerary, PlaceCoordinate};
use crate::services::{GeocodeClient, LodgingClient};
use futures_util::future::BoxFuture;
use futures_util::{stream, FutureExt, StreamExt};

/// Cap on in-flight upstream calls per fan-out stream.
const MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Resolve coordinates for every day's city and attractions.
///
/// Fans out across all days, and within each day across all location
/// names; the stage settles only once every lookup has succeeded or
/// failed. Individual failures never abort sibling lookups.
pub async fn enrich_coordinates(geocode: &GeocodeClient, itinerary: &mut Itinerary) {
    // Futures are built eagerly but stay inert until polled; collecting
    // them first sidesteps rust-lang/rust#102211, which otherwise rejects
    // a borrowing closure inside the stream when axum checks `Send`.
    let lookups: Vec<BoxFuture<'_, ()>> = itinerary
        .itinerary
        .iter_mut()
        .map(|day| enrich_day_coordinates(geocode, day))
        .collect();
    stream::iter(lookups)
        .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
        .collect::<Vec<()>>()
        .await;
}

/// Geocode one day: the city and all of its attractions, concurrently.
///
/// Returns an explicitly-signed boxed future: an `async fn` here trips a
/// rustc limitation (rust-lang/rust#102211) when the opaque future is
/// fanned out over `iter_mut` and later checked for `Send` at the axum
/// handler boundary.
fn enrich_day_coordinates<'a>(
    geocode: &'a GeocodeClient,
    day: &'a mut DayPlan,
) -> BoxFuture<'a, ()> {
    async move {
    let city_lookup = geocode.geocode(&day.city);

    // `buffered` keeps results in `locations` order; failed entries are
    // dropped below, so the pairing with the place name is what carries
    // the association, not the index.
    let location_lookups = stream::iter(day.locations.clone())
        .map(|name| {
            async move {
                let result = geocode.geocode(&name).await;
                (name, result)
            }
            .boxed()
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .collect::<Vec<_>>();

    let (city_result, location_results) = tokio::join!(city_lookup, location_lookups);

    match city_result {
        Ok(coordinates) => day.city_coordinates = Some(coordinates),
        Err(e) => {
            tracing::warn!(city = %day.city, error = %e, "Failed to geocode city");
        }
    }

    day.location_coordinates = location_results
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(coordinates) => Some(PlaceCoordinate { name, coordinates }),
            Err(e) => {
                tracing::warn!(location = %name, error = %e, "Failed to geocode location");
                None
            }
        })
        .collect();
    }
    .boxed()
}

/// Attach a lodging result to every day except the trip's final one.
///
/// Acquires one bearer token for the whole run. If the token exchange
/// fails, every eligible day degrades to the `NotFound` marker and the
/// pipeline continues; the itinerary is still valuable without lodging.
pub async fn enrich_lodging(lodging: &LodgingClient, itinerary: &mut Itinerary) {
    let day_count = itinerary.itinerary.len();
    if day_count < 2 {
        // Single-day trips have no onward lodging requirement.
        return;
    }
    let eligible = &mut itinerary.itinerary[..day_count - 1];

    let token = match lodging.fetch_access_token().await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Lodging token exchange failed, marking all days not found");
            for day in eligible.iter_mut() {
                day.hotel = Some(HotelResult::NotFound);
            }
            return;
        }
    };

    let token = token.as_str();
    // Eager future construction for the same reason as in
    // `enrich_coordinates`; nothing runs until the stream polls them.
    let searches: Vec<BoxFuture<'_, ()>> = eligible
        .iter_mut()
        .map(|day| enrich_day_lodging(lodging, token, day))
        .collect();
    stream::iter(searches)
        .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
        .collect::<Vec<()>>()
        .await;
}

/// Look up lodging for one day; always leaves `hotel` populated.
///
/// Boxed for the same rustc limitation as [`enrich_day_coordinates`].
fn enrich_day_lodging<'a>(
    lodging: &'a LodgingClient,
    token: &'a str,
    day: &'a mut DayPlan,
) -> BoxFuture<'a, ()> {
    async move {
    let Some(coordinates) = day.city_coordinates else {
        // No resolved city location means no lodging search is possible.
        day.hotel = Some(HotelResult::NotFound);
        return;
    };

    day.hotel = match lodging.search_nearby(token, coordinates).await {
        Ok(Some(hotel)) => Some(HotelResult::Found { hotel }),
        Ok(None) => {
            tracing::warn!(city = %day.city, "No lodging found near city");
            Some(HotelResult::NotFound)
        }
        Err(e) => {
            tracing::warn!(city = %day.city, error = %e, "Lodging lookup failed");
            Some(HotelResult::NotFound)
        }
    };
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Transportation};
    use chrono::NaiveDate;
    use mockito::Matcher;

    fn day(date: (i32, u32, u32), city: &str, locations: &[&str]) -> DayPlan {
        DayPlan {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            city: city.to_string(),
            activities: locations.iter().map(|l| format!("Visit {}", l)).collect(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            transportation: Transportation::Train,
            overview: String::new(),
            city_coordinates: None,
            location_coordinates: vec![],
            hotel: None,
        }
    }

    fn geocode_body(lat: f64, lng: f64) -> String {
        serde_json::json!({
            "status": "OK",
            "results": [{ "geometry": { "location": { "lat": lat, "lng": lng } } }]
        })
        .to_string()
    }

    async fn mock_geocode(
        server: &mut mockito::ServerGuard,
        address: &str,
        body: &str,
    ) -> mockito::Mock {
        server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), address.into()),
                Matcher::UrlEncoded("key".into(), "test_maps_key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async().await
    }

    #[tokio::test]
    async fn test_geocode_failure_is_isolated_per_location() {
        let mut server = mockito::Server::new_async().await;
        let client =
            GeocodeClient::new("test_maps_key".to_string()).with_base_url(server.url());

        let _city = mock_geocode(&mut server, "Tokyo", &geocode_body(35.68, 139.65)).await;
        let _ok = mock_geocode(&mut server, "Senso-ji", &geocode_body(35.71, 139.79)).await;
        let _fail = mock_geocode(
            &mut server,
            "Unknown Shrine",
            &serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }).to_string(),
        ).await;
        let _ok2 = mock_geocode(&mut server, "Meiji Jingu", &geocode_body(35.67, 139.70)).await;

        let mut itinerary = Itinerary {
            country: "Japan".to_string(),
            itinerary: vec![day(
                (2024, 8, 1),
                "Tokyo",
                &["Senso-ji", "Unknown Shrine", "Meiji Jingu"],
            )],
        };

        enrich_coordinates(&client, &mut itinerary).await;

        let enriched = &itinerary.itinerary[0];
        assert!(enriched.city_coordinates.is_some());
        assert!(enriched.city_coordinates.unwrap().is_valid());

        // Failed lookup is omitted; surviving entries keep their names.
        let names: Vec<&str> = enriched
            .location_coordinates
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Senso-ji", "Meiji Jingu"]);
    }

    #[tokio::test]
    async fn test_failed_city_geocode_leaves_coordinates_unset() {
        let mut server = mockito::Server::new_async().await;
        let client =
            GeocodeClient::new("test_maps_key".to_string()).with_base_url(server.url());

        let _city = mock_geocode(
            &mut server,
            "Atlantis",
            &serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }).to_string(),
        ).await;
        let _other_city = mock_geocode(&mut server, "Kyoto", &geocode_body(35.01, 135.77)).await;

        let mut itinerary = Itinerary {
            country: "Japan".to_string(),
            itinerary: vec![day((2024, 8, 1), "Atlantis", &[]), day((2024, 8, 2), "Kyoto", &[])],
        };

        enrich_coordinates(&client, &mut itinerary).await;

        assert!(itinerary.itinerary[0].city_coordinates.is_none());
        assert!(itinerary.itinerary[1].city_coordinates.is_some());
    }

    #[tokio::test]
    async fn test_lodging_token_failure_degrades_all_days() {
        let mut server = mockito::Server::new_async().await;
        let client = LodgingClient::new("id".to_string(), "secret".to_string())
            .with_base_url(server.url());

        let _token = server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async().await;

        let mut itinerary = Itinerary {
            country: "Japan".to_string(),
            itinerary: vec![
                day((2024, 8, 1), "Tokyo", &[]),
                day((2024, 8, 2), "Kyoto", &[]),
                day((2024, 8, 3), "Osaka", &[]),
            ],
        };
        for d in &mut itinerary.itinerary {
            d.city_coordinates = Some(Coordinates { lat: 35.0, lng: 135.0 });
        }

        enrich_lodging(&client, &mut itinerary).await;

        for d in &itinerary.itinerary[..2] {
            assert!(matches!(d.hotel, Some(HotelResult::NotFound)));
        }
        // Final day never gets a lodging attempt.
        assert!(itinerary.itinerary[2].hotel.is_none());
    }

    #[tokio::test]
    async fn test_lodging_skips_day_without_city_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let client = LodgingClient::new("id".to_string(), "secret".to_string())
            .with_base_url(server.url());

        let _token = server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","expires_in":1799}"#)
            .create_async().await;

        // Only the day with coordinates triggers a search.
        let _search = server
            .mock("GET", "/v1/reference-data/locations/hotels/by-geocode")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"name":"Hotel Granvia"}]}"#)
            .expect(1)
            .create_async().await;

        let mut itinerary = Itinerary {
            country: "Japan".to_string(),
            itinerary: vec![
                day((2024, 8, 1), "Atlantis", &[]),
                day((2024, 8, 2), "Kyoto", &[]),
                day((2024, 8, 3), "Osaka", &[]),
            ],
        };
        itinerary.itinerary[1].city_coordinates = Some(Coordinates { lat: 35.01, lng: 135.77 });

        enrich_lodging(&client, &mut itinerary).await;

        assert!(matches!(
            itinerary.itinerary[0].hotel,
            Some(HotelResult::NotFound)
        ));
        match &itinerary.itinerary[1].hotel {
            Some(HotelResult::Found { hotel }) => assert_eq!(hotel["name"], "Hotel Granvia"),
            other => panic!("expected found hotel, got {:?}", other),
        }
        assert!(itinerary.itinerary[2].hotel.is_none());
    }

    #[tokio::test]
    async fn test_single_day_trip_never_contacts_lodging_provider() {
        let mut server = mockito::Server::new_async().await;
        let client = LodgingClient::new("id".to_string(), "secret".to_string())
            .with_base_url(server.url());

        let token_mock = server
            .mock("POST", "/v1/security/oauth2/token")
            .expect(0)
            .create_async().await;

        let mut itinerary = Itinerary {
            country: "Japan".to_string(),
            itinerary: vec![day((2024, 8, 1), "Tokyo", &[])],
        };
        itinerary.itinerary[0].city_coordinates = Some(Coordinates { lat: 35.68, lng: 139.65 });

        enrich_lodging(&client, &mut itinerary).await;

        token_mock.assert_async().await;
        assert!(itinerary.itinerary[0].hotel.is_none());
    }
}
