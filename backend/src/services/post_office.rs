//! Post office directory loaded from CSV reference data
//!
//! The directory is built once at startup and handed to whoever needs it;
//! there is no process-wide cache.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use shared::{Coordinate, PostOffice, TelemetryResult};

use crate::external::Geocoder;

/// In-memory lookup table of post offices keyed by id
#[derive(Debug, Default, Clone)]
pub struct PostOfficeDirectory {
    offices: HashMap<String, PostOffice>,
    ids_by_name: HashMap<String, String>,
}

impl PostOfficeDirectory {
    /// A directory with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        let directory = Self::from_reader(file);
        tracing::info!(
            "Loaded {} post offices from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Parse CSV rows, skipping any row whose coordinates do not parse
    pub fn from_reader<R: Read>(reader: R) -> Self {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut directory = Self::default();
        for row in csv_reader.deserialize::<PostOffice>() {
            match row {
                Ok(office) => directory.insert(office),
                Err(e) => tracing::warn!("Skipping post office row: {}", e),
            }
        }
        directory
    }

    fn insert(&mut self, office: PostOffice) {
        if !office.office_name.is_empty() {
            self.ids_by_name
                .insert(office.office_name.to_lowercase(), office.id.clone());
        }
        self.offices.insert(office.id.clone(), office);
    }

    /// Details for a post office by id
    pub fn get(&self, id: &str) -> Option<&PostOffice> {
        self.offices.get(id)
    }

    /// Coordinates for a post office by id
    pub fn coordinates(&self, id: &str) -> Option<Coordinate> {
        self.get(id).map(PostOffice::coordinate)
    }

    /// Look up by id first, then by office name ignoring case
    pub fn find(&self, key: &str) -> Option<&PostOffice> {
        let key = key.trim();
        self.get(key).or_else(|| {
            self.ids_by_name
                .get(&key.to_lowercase())
                .and_then(|id| self.offices.get(id))
        })
    }

    pub fn len(&self) -> usize {
        self.offices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }
}

/// Resolves known post offices locally and everything else upstream
pub struct DirectoryGeocoder {
    directory: Arc<PostOfficeDirectory>,
    fallback: Arc<dyn Geocoder>,
}

impl DirectoryGeocoder {
    pub fn new(directory: Arc<PostOfficeDirectory>, fallback: Arc<dyn Geocoder>) -> Self {
        Self {
            directory,
            fallback,
        }
    }
}

#[async_trait]
impl Geocoder for DirectoryGeocoder {
    async fn geocode(&self, location: &str) -> TelemetryResult<Coordinate> {
        if let Some(office) = self.directory.find(location) {
            tracing::debug!("Resolved {:?} from post office {}", location, office.id);
            return Ok(office.coordinate());
        }
        self.fallback.geocode(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TelemetryError;

    const CSV: &str = "\
Pincode,OfficeName,City,Latitude,Longitude
400001, Mumbai GPO ,Mumbai,18.9398,72.8355
411001,Pune HO,Pune,18.5196,73.8553
110001,New Delhi GPO,Delhi,not-a-number,77.2167
";

    #[test]
    fn test_load_skips_bad_rows() {
        let directory = PostOfficeDirectory::from_reader(CSV.as_bytes());
        assert_eq!(directory.len(), 2);
        assert!(directory.get("110001").is_none());
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let directory = PostOfficeDirectory::from_reader(CSV.as_bytes());
        assert_eq!(
            directory.coordinates("400001"),
            Some(Coordinate::new(18.9398, 72.8355))
        );
        assert_eq!(directory.find("pune ho").map(|p| p.id.as_str()), Some("411001"));
        assert_eq!(directory.find("Mumbai GPO").map(|p| p.city.as_str()), Some("Mumbai"));
        assert!(directory.find("Chennai GPO").is_none());
    }

    #[test]
    fn test_po_id_header_is_accepted() {
        let csv = "PO_ID,Latitude,Longitude\nPO-7,12.97,77.59\n";
        let directory = PostOfficeDirectory::from_reader(csv.as_bytes());
        assert_eq!(directory.coordinates("PO-7"), Some(Coordinate::new(12.97, 77.59)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(PostOfficeDirectory::load("/nonexistent/post_offices.csv").is_err());
    }

    struct NotFound;

    #[async_trait]
    impl Geocoder for NotFound {
        async fn geocode(&self, location: &str) -> TelemetryResult<Coordinate> {
            Err(TelemetryError::GeocodeNotFound(location.to_string()))
        }
    }

    #[tokio::test]
    async fn test_directory_geocoder_prefers_directory() {
        let directory = Arc::new(PostOfficeDirectory::from_reader(CSV.as_bytes()));
        let geocoder = DirectoryGeocoder::new(directory, Arc::new(NotFound));

        assert_eq!(
            geocoder.geocode("411001").await,
            Ok(Coordinate::new(18.5196, 73.8553))
        );
        assert_eq!(
            geocoder.geocode("Nowhere").await,
            Err(TelemetryError::GeocodeNotFound("Nowhere".to_string()))
        );
    }
}
