//! Climb submission: the wizard step machine and the submission payload.
//!
//! The wizard walks a user through `image -> region -> crag -> draw ->
//! review -> submitting` and ends in `success` or `error`. Each step owns
//! everything gathered so far, so a step value alone is enough to resume
//! or render the wizard. The payload built at the `review -> submitting`
//! edge is the same [`SubmissionRequest`] accepted by `POST /submissions`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grades::is_valid_submission_grade;
use crate::types::DbId;

/// Routes a single user may submit per UTC day unless configured otherwise.
pub const DEFAULT_MAX_ROUTES_PER_DAY: i64 = 5;

/// Minimum number of points in a drawn route line.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Colour stored on route lines created through submissions.
pub const DEFAULT_ROUTE_COLOR: &str = "red";

// ---------------------------------------------------------------------------
// Shared value types
// ---------------------------------------------------------------------------

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A point of a drawn route line, in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub x: f64,
    pub y: f64,
}

/// Id and display name of a selected region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: DbId,
    pub name: String,
}

/// A selected crag with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CragRef {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The photo a submission draws on: an already-stored image or a fresh upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ImageSelection {
    Existing {
        image_id: DbId,
        image_url: String,
        gps: Option<GpsPoint>,
    },
    New {
        uploaded_url: String,
        gps: Option<GpsPoint>,
        capture_date: Option<NaiveDate>,
        width: i32,
        height: i32,
    },
}

impl ImageSelection {
    /// GPS position attached to the photo, if any.
    pub fn gps(&self) -> Option<GpsPoint> {
        match self {
            Self::Existing { gps, .. } | Self::New { gps, .. } => *gps,
        }
    }
}

/// A route drawn on the submission image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoute {
    pub name: String,
    pub grade: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points: Vec<RoutePoint>,
    pub sequence_order: i32,
}

impl NewRoute {
    /// Check a single route and return it with trimmed text fields.
    pub fn validated(&self) -> Result<NewRoute, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Route name is required".into()));
        }
        if !is_valid_submission_grade(&self.grade) {
            return Err(CoreError::Validation(format!("Invalid grade: {}", self.grade)));
        }
        if self.points.len() < MIN_ROUTE_POINTS {
            return Err(CoreError::Validation(format!(
                "Route must have at least {MIN_ROUTE_POINTS} points"
            )));
        }

        Ok(NewRoute {
            name: name.to_string(),
            grade: self.grade.clone(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            points: self.points.clone(),
            sequence_order: self.sequence_order,
        })
    }
}

fn validate_routes(routes: &[NewRoute]) -> Result<Vec<NewRoute>, CoreError> {
    if routes.is_empty() {
        return Err(CoreError::Validation("At least one route is required".into()));
    }
    routes.iter().map(NewRoute::validated).collect()
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// Body of `POST /submissions`, tagged by `mode`.
///
/// Optional fields are optional on the wire so that missing values produce
/// a descriptive validation error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubmissionRequest {
    New {
        image_url: Option<String>,
        image_lat: Option<f64>,
        image_lng: Option<f64>,
        #[serde(default)]
        capture_date: Option<NaiveDate>,
        #[serde(default)]
        width: Option<i32>,
        #[serde(default)]
        height: Option<i32>,
        crag_id: Option<DbId>,
        routes: Vec<NewRoute>,
    },
    Existing {
        image_id: Option<DbId>,
        routes: Vec<NewRoute>,
    },
}

/// Image row to create for a new-image submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capture_date: Option<NaiveDate>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub crag_id: DbId,
}

/// Where the submitted route lines are drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTarget {
    New(NewImage),
    Existing(DbId),
}

/// A submission that passed every local check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub image: ImageTarget,
    pub routes: Vec<NewRoute>,
}

impl SubmissionRequest {
    /// Number of routes carried by the request.
    pub fn route_count(&self) -> usize {
        match self {
            Self::New { routes, .. } | Self::Existing { routes, .. } => routes.len(),
        }
    }

    /// Validate the payload. Routes are checked before image fields.
    pub fn validate(&self) -> Result<ValidatedSubmission, CoreError> {
        match self {
            Self::New {
                image_url,
                image_lat,
                image_lng,
                capture_date,
                width,
                height,
                crag_id,
                routes,
            } => {
                let routes = validate_routes(routes)?;
                let url = image_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| CoreError::Validation("Image URL is required".into()))?;
                let (Some(latitude), Some(longitude)) = (*image_lat, *image_lng) else {
                    return Err(CoreError::Validation(
                        "GPS coordinates are required for new images".into(),
                    ));
                };
                crate::geo::validate_coordinates(latitude, longitude)?;
                let crag_id =
                    crag_id.ok_or_else(|| CoreError::Validation("Crag ID is required".into()))?;

                Ok(ValidatedSubmission {
                    image: ImageTarget::New(NewImage {
                        url: url.to_string(),
                        latitude,
                        longitude,
                        capture_date: *capture_date,
                        width: *width,
                        height: *height,
                        crag_id,
                    }),
                    routes,
                })
            }
            Self::Existing { image_id, routes } => {
                let routes = validate_routes(routes)?;
                let image_id =
                    image_id.ok_or_else(|| CoreError::Validation("Image ID is required".into()))?;
                Ok(ValidatedSubmission {
                    image: ImageTarget::Existing(image_id),
                    routes,
                })
            }
        }
    }
}

/// Raised when a submission would push a user past the daily route limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Daily limit exceeded. You can submit {max} routes per day. \
     You have {already} already and are trying to submit {incoming}."
)]
pub struct DailyLimitExceeded {
    pub max: i64,
    pub already: i64,
    pub incoming: usize,
}

/// Check that `incoming` more routes fit into today's allowance.
pub fn check_daily_limit(already: i64, incoming: usize, max: i64) -> Result<(), DailyLimitExceeded> {
    let incoming_i64 = i64::try_from(incoming).unwrap_or(i64::MAX);
    if already.saturating_add(incoming_i64) > max {
        return Err(DailyLimitExceeded {
            max,
            already,
            incoming,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Wizard step machine
// ---------------------------------------------------------------------------

/// One step of the submission wizard, carrying everything gathered so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SubmissionStep {
    Image,
    Region {
        image: ImageSelection,
    },
    Crag {
        image: ImageSelection,
        region: NamedRef,
    },
    Draw {
        image: ImageSelection,
        region: NamedRef,
        crag: CragRef,
    },
    Review {
        image: ImageSelection,
        region: NamedRef,
        crag: CragRef,
        routes: Vec<NewRoute>,
    },
    Submitting {
        request: SubmissionRequest,
    },
    Success {
        climbs_created: usize,
    },
    Error {
        message: String,
    },
}

/// Input that advances the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    ImageSelected(ImageSelection),
    RegionSelected(NamedRef),
    CragSelected(CragRef),
    RoutesDrawn(Vec<NewRoute>),
    Submit,
    Succeeded { climbs_created: usize },
    Failed { message: String },
}

impl SubmissionEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::ImageSelected(_) => "image_selected",
            Self::RegionSelected(_) => "region_selected",
            Self::CragSelected(_) => "crag_selected",
            Self::RoutesDrawn(_) => "routes_drawn",
            Self::Submit => "submit",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl Default for SubmissionStep {
    fn default() -> Self {
        Self::Image
    }
}

impl SubmissionStep {
    /// Wire name of the step.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Region { .. } => "region",
            Self::Crag { .. } => "crag",
            Self::Draw { .. } => "draw",
            Self::Review { .. } => "review",
            Self::Submitting { .. } => "submitting",
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
        }
    }

    /// `success` and `error` accept no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }

    /// GPS position of the chosen photo, once one is chosen.
    pub fn image_gps(&self) -> Option<GpsPoint> {
        match self {
            Self::Region { image }
            | Self::Crag { image, .. }
            | Self::Draw { image, .. }
            | Self::Review { image, .. } => image.gps(),
            _ => None,
        }
    }

    /// Compute the step that follows `event`.
    ///
    /// Only the single forward edge out of each step is accepted; `self`
    /// is left untouched when the event is rejected.
    pub fn apply(&self, event: SubmissionEvent) -> Result<SubmissionStep, CoreError> {
        match (self, event) {
            (Self::Image, SubmissionEvent::ImageSelected(image)) => Ok(Self::Region { image }),

            (Self::Region { image }, SubmissionEvent::RegionSelected(region)) => Ok(Self::Crag {
                image: image.clone(),
                region,
            }),

            (Self::Crag { image, region }, SubmissionEvent::CragSelected(crag)) => {
                Ok(Self::Draw {
                    image: image.clone(),
                    region: region.clone(),
                    crag,
                })
            }

            (
                Self::Draw {
                    image,
                    region,
                    crag,
                },
                SubmissionEvent::RoutesDrawn(routes),
            ) => Ok(Self::Review {
                image: image.clone(),
                region: region.clone(),
                crag: crag.clone(),
                routes: validate_routes(&routes)?,
            }),

            (
                Self::Review {
                    image,
                    crag,
                    routes,
                    ..
                },
                SubmissionEvent::Submit,
            ) => {
                let request = build_request(image, crag, routes);
                request.validate()?;
                Ok(Self::Submitting { request })
            }

            (Self::Submitting { .. }, SubmissionEvent::Succeeded { climbs_created }) => {
                Ok(Self::Success { climbs_created })
            }

            (Self::Submitting { .. }, SubmissionEvent::Failed { message }) => {
                Ok(Self::Error { message })
            }

            (step, event) => Err(CoreError::Validation(format!(
                "Cannot apply '{}' while at step '{}'",
                event.name(),
                step.name()
            ))),
        }
    }
}

fn build_request(image: &ImageSelection, crag: &CragRef, routes: &[NewRoute]) -> SubmissionRequest {
    match image {
        ImageSelection::Existing { image_id, .. } => SubmissionRequest::Existing {
            image_id: Some(*image_id),
            routes: routes.to_vec(),
        },
        ImageSelection::New {
            uploaded_url,
            gps,
            capture_date,
            width,
            height,
        } => SubmissionRequest::New {
            image_url: Some(uploaded_url.clone()),
            image_lat: gps.map(|g| g.latitude),
            image_lng: gps.map(|g| g.longitude),
            capture_date: *capture_date,
            width: Some(*width),
            height: Some(*height),
            crag_id: Some(crag.id),
            routes: routes.to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    fn route(name: &str, grade: &str) -> NewRoute {
        NewRoute {
            name: name.to_string(),
            grade: grade.to_string(),
            description: None,
            points: vec![RoutePoint { x: 0.1, y: 0.9 }, RoutePoint { x: 0.2, y: 0.1 }],
            sequence_order: 0,
        }
    }

    fn new_image(gps: Option<GpsPoint>) -> ImageSelection {
        ImageSelection::New {
            uploaded_url: "https://cdn.example/p.jpg".into(),
            gps,
            capture_date: None,
            width: 1200,
            height: 800,
        }
    }

    fn gps() -> GpsPoint {
        GpsPoint {
            latitude: 49.45,
            longitude: -2.58,
        }
    }

    fn region() -> NamedRef {
        NamedRef {
            id: Uuid::new_v4(),
            name: "Guernsey".into(),
        }
    }

    fn crag() -> CragRef {
        CragRef {
            id: Uuid::new_v4(),
            name: "Le Gouffre".into(),
            latitude: 49.42,
            longitude: -2.60,
        }
    }

    fn walk_to_review(image: ImageSelection) -> SubmissionStep {
        SubmissionStep::Image
            .apply(SubmissionEvent::ImageSelected(image))
            .unwrap()
            .apply(SubmissionEvent::RegionSelected(region()))
            .unwrap()
            .apply(SubmissionEvent::CragSelected(crag()))
            .unwrap()
            .apply(SubmissionEvent::RoutesDrawn(vec![route("Arete", "6B")]))
            .unwrap()
    }

    #[test]
    fn forward_walk_visits_steps_in_order() {
        let mut step = SubmissionStep::default();
        let mut names = vec![step.name()];

        for event in [
            SubmissionEvent::ImageSelected(new_image(Some(gps()))),
            SubmissionEvent::RegionSelected(region()),
            SubmissionEvent::CragSelected(crag()),
            SubmissionEvent::RoutesDrawn(vec![route("Arete", "6B")]),
            SubmissionEvent::Submit,
            SubmissionEvent::Succeeded { climbs_created: 1 },
        ] {
            step = step.apply(event).unwrap();
            names.push(step.name());
        }

        assert_eq!(
            names,
            ["image", "region", "crag", "draw", "review", "submitting", "success"]
        );
        assert!(step.is_terminal());
        assert_matches!(step, SubmissionStep::Success { climbs_created: 1 });
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        let step = SubmissionStep::Image;
        assert!(step.apply(SubmissionEvent::CragSelected(crag())).is_err());
        assert!(step.apply(SubmissionEvent::Submit).is_err());

        let region_step = step
            .apply(SubmissionEvent::ImageSelected(new_image(None)))
            .unwrap();
        assert!(region_step
            .apply(SubmissionEvent::RoutesDrawn(vec![route("x", "6A")]))
            .is_err());
    }

    #[test]
    fn going_back_is_rejected() {
        let review = walk_to_review(new_image(Some(gps())));
        let err = review
            .apply(SubmissionEvent::ImageSelected(new_image(None)))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("review"));
    }

    #[test]
    fn failure_is_terminal_and_keeps_message() {
        let submitting = walk_to_review(new_image(Some(gps())))
            .apply(SubmissionEvent::Submit)
            .unwrap();
        let failed = submitting
            .apply(SubmissionEvent::Failed {
                message: "network down".into(),
            })
            .unwrap();

        assert!(failed.is_terminal());
        assert_matches!(&failed, SubmissionStep::Error { message } if message == "network down");
        assert!(failed.apply(SubmissionEvent::Submit).is_err());
        assert!(failed
            .apply(SubmissionEvent::Succeeded { climbs_created: 1 })
            .is_err());
    }

    #[test]
    fn success_accepts_nothing_further() {
        let done = SubmissionStep::Success { climbs_created: 2 };
        assert!(done
            .apply(SubmissionEvent::Failed {
                message: "late".into()
            })
            .is_err());
        assert!(done.apply(SubmissionEvent::ImageSelected(new_image(None))).is_err());
    }

    #[test]
    fn outcome_events_only_accepted_while_submitting() {
        let review = walk_to_review(new_image(Some(gps())));
        assert!(review
            .apply(SubmissionEvent::Succeeded { climbs_created: 1 })
            .is_err());
        assert!(review
            .apply(SubmissionEvent::Failed {
                message: "x".into()
            })
            .is_err());
    }

    #[test]
    fn drawing_requires_valid_routes() {
        let draw = SubmissionStep::Image
            .apply(SubmissionEvent::ImageSelected(new_image(Some(gps()))))
            .unwrap()
            .apply(SubmissionEvent::RegionSelected(region()))
            .unwrap()
            .apply(SubmissionEvent::CragSelected(crag()))
            .unwrap();

        assert!(draw.apply(SubmissionEvent::RoutesDrawn(vec![])).is_err());
        assert!(draw
            .apply(SubmissionEvent::RoutesDrawn(vec![route("Arete", "12Z")]))
            .is_err());
        assert_eq!(draw.name(), "draw");
    }

    #[test]
    fn submit_without_gps_on_new_image_is_rejected() {
        let review = walk_to_review(new_image(None));
        let err = review.apply(SubmissionEvent::Submit).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("GPS"));
    }

    #[test]
    fn submit_builds_existing_image_request() {
        let image_id = Uuid::new_v4();
        let review = walk_to_review(ImageSelection::Existing {
            image_id,
            image_url: "https://cdn.example/e.jpg".into(),
            gps: None,
        });
        let submitting = review.apply(SubmissionEvent::Submit).unwrap();
        assert_matches!(
            submitting,
            SubmissionStep::Submitting {
                request: SubmissionRequest::Existing { image_id: Some(id), .. }
            } if id == image_id
        );
    }

    #[test]
    fn image_gps_tracks_the_selected_photo() {
        let step = SubmissionStep::Image
            .apply(SubmissionEvent::ImageSelected(new_image(Some(gps()))))
            .unwrap();
        assert_eq!(step.image_gps(), Some(gps()));
        assert_eq!(SubmissionStep::Image.image_gps(), None);
    }

    #[test]
    fn step_serializes_with_step_tag() {
        let json = serde_json::to_value(SubmissionStep::Success { climbs_created: 3 }).unwrap();
        assert_eq!(json["step"], "success");
        assert_eq!(json["climbs_created"], 3);
    }

    // -- Payload validation ----------------------------------------------

    #[test]
    fn new_mode_payload_validates_and_trims() {
        let crag_id = Uuid::new_v4();
        let request: SubmissionRequest = serde_json::from_value(serde_json::json!({
            "mode": "new",
            "image_url": "https://cdn.example/p.jpg",
            "image_lat": 49.4,
            "image_lng": -2.6,
            "crag_id": crag_id,
            "routes": [{
                "name": "  Slab ",
                "grade": "6A",
                "description": "   ",
                "points": [{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 4.0}],
                "sequence_order": 1
            }]
        }))
        .unwrap();

        let validated = request.validate().unwrap();
        assert_eq!(validated.routes[0].name, "Slab");
        assert_eq!(validated.routes[0].description, None);
        assert_matches!(validated.image, ImageTarget::New(NewImage { crag_id: id, .. }) if id == crag_id);
    }

    #[test]
    fn payload_errors_are_reported() {
        let no_routes = SubmissionRequest::Existing {
            image_id: Some(Uuid::new_v4()),
            routes: vec![],
        };
        assert_matches!(no_routes.validate(), Err(CoreError::Validation(m)) if m.contains("At least one route"));

        let mut short = route("Line", "6A");
        short.points.truncate(1);
        let one_point = SubmissionRequest::Existing {
            image_id: Some(Uuid::new_v4()),
            routes: vec![short],
        };
        assert_matches!(one_point.validate(), Err(CoreError::Validation(m)) if m.contains("2 points"));

        let missing_image = SubmissionRequest::Existing {
            image_id: None,
            routes: vec![route("Line", "6A")],
        };
        assert_matches!(missing_image.validate(), Err(CoreError::Validation(m)) if m.contains("Image ID"));

        let missing_crag = SubmissionRequest::New {
            image_url: Some("u".into()),
            image_lat: Some(1.0),
            image_lng: Some(1.0),
            capture_date: None,
            width: None,
            height: None,
            crag_id: None,
            routes: vec![route("Line", "6A")],
        };
        assert_matches!(missing_crag.validate(), Err(CoreError::Validation(m)) if m.contains("Crag ID"));
    }

    #[test]
    fn daily_limit_counts_existing_and_incoming() {
        assert!(check_daily_limit(0, 5, 5).is_ok());
        assert!(check_daily_limit(3, 2, 5).is_ok());
        let err = check_daily_limit(4, 2, 5).unwrap_err();
        assert_eq!(err.already, 4);
        assert!(err.to_string().contains("5 routes per day"));
    }
}
