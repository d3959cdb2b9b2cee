use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::{
    config::project_dirs,
    model::{Location, LocationQuery, Weather},
    provider::ProviderId,
};

/// On-disk weather cache: one JSON document per location.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    root: PathBuf,
}

impl WeatherCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted in the platform cache directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.cache_dir().join("weather")))
    }

    fn path_for(&self, location: &Location) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(&location.formatted_id())))
    }

    fn location_path_for(&self, query: &LocationQuery, source: ProviderId) -> PathBuf {
        let mut id = format!("{}&{}&{source}", query.latitude, query.longitude);
        if let Some(zip) = &query.zip_code {
            id.push('&');
            id.push_str(zip);
        }
        self.root.join("locations").join(format!("{}.json", file_stem(&id)))
    }

    /// Cached weather for `location`, or `None` when nothing was stored yet.
    #[instrument(skip(self, location), fields(location = %location.formatted_id()))]
    pub fn read(&self, location: &Location) -> Result<Option<Weather>> {
        let weather = read_json(&self.path_for(location))?;
        if weather.is_none() {
            debug!("no cached weather");
        }
        Ok(weather)
    }

    #[instrument(skip(self, location, weather), fields(location = %location.formatted_id()))]
    pub fn write(&self, location: &Location, weather: &Weather) -> Result<()> {
        let path = self.path_for(location);
        write_json(&path, weather)?;
        debug!(path = %path.display(), "cached weather");
        Ok(())
    }

    /// Location `source` resolved earlier for `query`, if any.
    #[instrument(skip(self), fields(lat = query.latitude, lon = query.longitude))]
    pub fn read_location(
        &self,
        query: &LocationQuery,
        source: ProviderId,
    ) -> Result<Option<Location>> {
        read_json(&self.location_path_for(query, source))
    }

    pub fn write_location(&self, query: &LocationQuery, location: &Location) -> Result<()> {
        let path = self.location_path_for(query, location.source);
        write_json(&path, location)?;
        debug!(path = %path.display(), "cached location");
        Ok(())
    }

    /// Drop the cached weather for `location`. Missing entries are not an error.
    pub fn remove(&self, location: &Location) -> Result<()> {
        let path = self.path_for(location);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err)
                .with_context(|| format!("Failed to remove cache file: {}", path.display())),
            _ => Ok(()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read cache file: {}", path.display()));
        }
    };

    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create cache directory: {}", parent.display())
        })?;
    }

    let json = serde_json::to_string(value).context("Failed to serialize cache entry")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write cache file: {}", path.display()))
}

/// Location ids contain `&`, `.` and `-`; keep only what is safe in a file name.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}
