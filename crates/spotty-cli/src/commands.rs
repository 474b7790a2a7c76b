//! One-shot commands against the facility service.

use anyhow::Context;
use spotty_app::LocationProvider;
use spotty_client::{FacilityRepository, HttpFacilityRepository};
use spotty_core::{AppConfig, Coordinate, FacilityDraft, FacilityId, RatingDraft};

use crate::display;

/// Fields of the `add` command after flag inversion.
#[derive(Debug)]
pub struct AddArgs {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub is_free: bool,
    pub running_water: bool,
    pub open_in_winter: bool,
    pub gender_neutral: bool,
}

impl AddArgs {
    fn into_draft(self) -> anyhow::Result<FacilityDraft> {
        let location = Coordinate::new(self.lat, self.lng)?;
        Ok(FacilityDraft {
            location,
            name: self.name,
            is_free: self.is_free,
            running_water: self.running_water,
            open_in_winter: self.open_in_winter,
            gender_neutral: self.gender_neutral,
        })
    }
}

pub async fn health(repo: &HttpFacilityRepository) -> anyhow::Result<()> {
    let message = repo
        .health()
        .await
        .with_context(|| format!("service at {} is not reachable", repo.base_url()))?;
    println!("{message}");
    Ok(())
}

pub async fn near(
    repo: &HttpFacilityRepository,
    config: &AppConfig,
    point: Option<(f64, f64)>,
    radius_km: Option<f64>,
) -> anyhow::Result<()> {
    let center = match point {
        Some((lat, lng)) => Coordinate::new(lat, lng)?,
        None => {
            let resolution = LocationProvider::from_config(config).resolve().await;
            if let Some(advisory) = resolution.advisory() {
                eprintln!("{advisory}");
            }
            resolution.coordinate()
        }
    };
    let radius_km = radius_km.unwrap_or(config.search_radius_km);
    anyhow::ensure!(
        radius_km.is_finite() && radius_km > 0.0,
        "radius must be a positive number of kilometres"
    );

    let facilities = repo.fetch_near(center, radius_km).await?;
    print!("{}", display::list(&facilities, Some(center)));
    Ok(())
}

pub async fn show(repo: &HttpFacilityRepository, id: &str) -> anyhow::Result<()> {
    let facility = repo.get(&FacilityId::new(id)).await?;
    print!("{}", display::details(&facility));
    Ok(())
}

pub async fn add(repo: &HttpFacilityRepository, args: AddArgs) -> anyhow::Result<()> {
    let body = args.into_draft()?.to_new_facility()?;
    let created = repo.create(&body).await?;
    println!("Added {}", display::summary(&created, None));
    Ok(())
}

pub async fn rate(
    repo: &HttpFacilityRepository,
    id: &str,
    cleanliness: u8,
    comment: Option<String>,
) -> anyhow::Result<()> {
    let rating = RatingDraft::new(cleanliness, comment)?;
    let facility = repo.rate(&FacilityId::new(id), &rating).await?;
    println!("Rated {}", display::summary(&facility, None));
    Ok(())
}
