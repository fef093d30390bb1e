use async_trait::async_trait;

use crate::{LookupError, config::HomeConfig, model::Place};

use super::GeolocationProvider;

/// Locator that always answers with the configured home location.
///
/// The configured coordinates are only validated when a location is requested,
/// so a broken `[home]` table does not affect searches.
#[derive(Debug, Clone)]
pub struct HomeLocator {
    home: Option<HomeConfig>,
}

impl HomeLocator {
    pub fn new(home: Option<HomeConfig>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl GeolocationProvider for HomeLocator {
    async fn locate(&self) -> Result<Place, LookupError> {
        let home = self.home.as_ref().ok_or_else(|| {
            LookupError::LocationUnsupported(
                "No home location configured. Hint: run `sundash configure` first.".to_string(),
            )
        })?;

        home.to_place()
            .map_err(|e| LookupError::LocationUnavailable(LookupError::cause(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Coordinates, render};

    #[tokio::test]
    async fn returns_configured_home() {
        let home = HomeConfig { latitude: 1.0, longitude: 2.0, label: Some("Here".into()) };

        let place = HomeLocator::new(Some(home)).locate().await.unwrap();
        assert_eq!(place, Place::new(Coordinates::new(1.0, 2.0).unwrap(), Some("Here".into())));
    }

    #[tokio::test]
    async fn missing_home_tells_user_how_to_configure() {
        let err = HomeLocator::new(None).locate().await.unwrap_err();
        assert!(matches!(err, LookupError::LocationUnsupported(_)));

        match render::notice_for(&err) {
            render::Notice::DashboardError(text) => {
                assert!(text.contains("not supported"), "{text}");
                assert!(text.contains("sundash configure"), "{text}");
            }
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_home_fails_only_when_located() {
        let locator = HomeLocator::new(Some(HomeConfig {
            latitude: 0.0,
            longitude: 500.0,
            label: None,
        }));

        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LookupError::LocationUnavailable(ref c) if c.contains("Invalid home")));
    }
}
