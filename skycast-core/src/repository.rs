use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument, warn};

use crate::{
    cache::WeatherCache,
    error::ConvertError,
    model::{Location, LocationQuery, Weather},
    provider::WeatherProvider,
};

/// Where a [`WeatherResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Cached and still within the polling interval.
    Cache,
    /// Freshly fetched.
    Provider,
    /// The fetch failed; this is the last cached weather.
    StaleCache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    pub weather: Weather,
    pub origin: Origin,
}

/// Serves weather from the cache while it is fresh, from the provider otherwise.
pub struct WeatherRepository<'a> {
    provider: &'a dyn WeatherProvider,
    cache: WeatherCache,
    polling_interval: Duration,
}

impl<'a> WeatherRepository<'a> {
    pub fn new(
        provider: &'a dyn WeatherProvider,
        cache: WeatherCache,
        polling_interval: Duration,
    ) -> Self {
        Self { provider, cache, polling_interval }
    }

    /// Location for `query`, reusing the one resolved on an earlier run.
    ///
    /// Only the first lookup for a coordinate needs the network.
    #[instrument(skip(self), fields(provider = %self.provider.id()))]
    pub async fn resolve_location(&self, query: &LocationQuery) -> Result<Location> {
        match self.cache.read_location(query, self.provider.id()) {
            Ok(Some(location)) => {
                debug!(location = %location.formatted_id(), "using cached location");
                return Ok(location);
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "ignoring unreadable cached location"),
        }

        let location = self.provider.request_location(query).await?;
        if let Err(err) = self.cache.write_location(query, &location) {
            warn!(error = %err, "failed to cache location");
        }
        Ok(location)
    }

    #[instrument(
        skip(self, location),
        fields(location = %location.formatted_id(), provider = %self.provider.id())
    )]
    pub async fn get_weather(
        &self,
        location: &Location,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<WeatherResult> {
        let cached = self.cache.read(location).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable cache entry");
            None
        });

        let fresh = cached.as_ref().filter(|w| w.is_valid(now, Some(self.polling_interval)));
        if let (false, Some(weather)) = (force, fresh) {
            debug!("serving cached weather");
            return Ok(WeatherResult { weather: weather.clone(), origin: Origin::Cache });
        }

        match self.provider.get_weather(location, now).await {
            Ok(weather) => {
                if let Err(err) = self.cache.write(location, &weather) {
                    warn!(error = %err, "failed to cache weather");
                }
                Ok(WeatherResult { weather, origin: Origin::Provider })
            }
            Err(err) => {
                match err.downcast_ref::<ConvertError>() {
                    Some(convert) => warn!(error = %convert, "provider returned unusable data"),
                    None => warn!(error = %err, "weather fetch failed"),
                }

                match cached {
                    Some(weather) => Ok(WeatherResult { weather, origin: Origin::StaleCache }),
                    None => Err(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Alert, Base},
        provider::ProviderId,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Debug)]
    enum Outcome {
        Succeed,
        BadData,
        Offline,
    }

    #[derive(Debug)]
    struct FakeProvider {
        outcome: Outcome,
        calls: AtomicUsize,
        lookups: AtomicUsize,
    }

    impl FakeProvider {
        fn new(outcome: Outcome) -> Self {
            Self { outcome, calls: AtomicUsize::new(0), lookups: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        fn id(&self) -> ProviderId {
            ProviderId::MetIe
        }

        async fn request_location(&self, query: &LocationQuery) -> Result<Location> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Offline => Err(anyhow!("connection refused")),
                _ => {
                    let mut location = Location::from_coordinates(
                        query.latitude,
                        query.longitude,
                        ProviderId::MetIe,
                    );
                    location.city = "Dublin".into();
                    Ok(location)
                }
            }
        }

        async fn get_weather(&self, _location: &Location, now: DateTime<Utc>) -> Result<Weather> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Succeed => Ok(weather_at(now)),
                Outcome::BadData => Err(ConvertError::InvalidOrIncompleteData.into()),
                Outcome::Offline => Err(anyhow!("connection refused")),
            }
        }

        async fn get_alerts(&self, _location: &Location) -> Result<Option<Vec<Alert>>> {
            Ok(None)
        }
    }

    fn weather_at(update: DateTime<Utc>) -> Weather {
        Weather {
            base: Base { city_id: None, publish_date: update, update_date: update },
            current: None,
            yesterday: None,
            daily_forecast: Vec::new(),
            hourly_forecast: Vec::new(),
            minutely_forecast: Vec::new(),
            alert_list: Vec::new(),
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
    }

    fn location() -> Location {
        Location::from_coordinates(53.35, -6.26, ProviderId::MetIe)
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_provider() {
        let dir = tempdir().unwrap();
        let cache = WeatherCache::new(dir.path());
        cache.write(&location(), &weather_at(at(12, 0))).unwrap();

        let provider = FakeProvider::new(Outcome::Succeed);
        let repo = WeatherRepository::new(&provider, cache, Duration::minutes(90));

        let result = repo.get_weather(&location(), at(13, 0), false).await.unwrap();
        assert_eq!(result.origin, Origin::Cache);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn expired_or_forced_refetches_and_caches() {
        let dir = tempdir().unwrap();
        let cache = WeatherCache::new(dir.path());
        cache.write(&location(), &weather_at(at(12, 0))).unwrap();

        let provider = FakeProvider::new(Outcome::Succeed);
        let repo = WeatherRepository::new(&provider, cache.clone(), Duration::minutes(90));

        let result = repo.get_weather(&location(), at(14, 0), false).await.unwrap();
        assert_eq!(result.origin, Origin::Provider);
        assert_eq!(result.weather.base.update_date, at(14, 0));
        assert_eq!(cache.read(&location()).unwrap(), Some(weather_at(at(14, 0))));

        let result = repo.get_weather(&location(), at(14, 5), true).await.unwrap();
        assert_eq!(result.origin, Origin::Provider);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failure_falls_back_to_stale_cache() {
        let dir = tempdir().unwrap();
        let cache = WeatherCache::new(dir.path());
        cache.write(&location(), &weather_at(at(6, 0))).unwrap();

        for outcome in [Outcome::BadData, Outcome::Offline] {
            let provider = FakeProvider::new(outcome);
            let repo = WeatherRepository::new(&provider, cache.clone(), Duration::minutes(90));

            let result = repo.get_weather(&location(), at(14, 0), false).await.unwrap();
            assert_eq!(result.origin, Origin::StaleCache);
            assert_eq!(result.weather.base.update_date, at(6, 0));
        }
    }

    #[tokio::test]
    async fn failure_without_cache_is_an_error() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new(Outcome::BadData);
        let repo =
            WeatherRepository::new(&provider, WeatherCache::new(dir.path()), Duration::minutes(90));

        let err = repo.get_weather(&location(), at(14, 0), false).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ConvertError>(), Some(&ConvertError::InvalidOrIncompleteData));
    }

    #[tokio::test]
    async fn location_is_resolved_once() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new(Outcome::Succeed);
        let repo =
            WeatherRepository::new(&provider, WeatherCache::new(dir.path()), Duration::minutes(90));
        let query = LocationQuery::new(53.35, -6.26);

        let first = repo.resolve_location(&query).await.unwrap();
        let second = repo.resolve_location(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.city, "Dublin");
        assert_eq!(provider.lookups(), 1);
    }

    #[tokio::test]
    async fn offline_run_serves_stale_weather_for_known_place() {
        let dir = tempdir().unwrap();
        let cache = WeatherCache::new(dir.path());
        let query = LocationQuery::new(53.35, -6.26);

        let online = FakeProvider::new(Outcome::Succeed);
        let repo = WeatherRepository::new(&online, cache.clone(), Duration::minutes(90));
        let location = repo.resolve_location(&query).await.unwrap();
        repo.get_weather(&location, at(6, 0), false).await.unwrap();

        let offline = FakeProvider::new(Outcome::Offline);
        let repo = WeatherRepository::new(&offline, cache, Duration::minutes(90));
        let location = repo.resolve_location(&query).await.unwrap();
        let result = repo.get_weather(&location, at(14, 0), false).await.unwrap();

        assert_eq!(result.origin, Origin::StaleCache);
        assert_eq!(result.weather.base.update_date, at(6, 0));
        assert_eq!(offline.lookups(), 0);
    }

    #[tokio::test]
    async fn unknown_place_offline_is_an_error() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new(Outcome::Offline);
        let repo =
            WeatherRepository::new(&provider, WeatherCache::new(dir.path()), Duration::minutes(90));

        let err = repo.resolve_location(&LocationQuery::new(53.35, -6.26)).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
