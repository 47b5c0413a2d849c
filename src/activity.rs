//! Activity registry: the in-memory roster store.
//!
//! Every roster mutation runs its guards and the change itself under one
//! write lock, so concurrent enrollments cannot lose updates or admit a
//! student twice.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// An extracurricular activity and its current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: usize,
    /// Student emails in signup order.
    pub participants: Vec<String>,
}

impl Activity {
    pub fn new(
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: usize,
    ) -> Self {
        Self {
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: Vec::new(),
        }
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for email in participants {
            let email = email.into();
            if !self.is_enrolled(&email) {
                self.participants.push(email);
            }
        }
        self
    }

    pub fn is_enrolled(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }
}

/// Activities keyed by name.
pub type Activities = BTreeMap<String, Activity>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Activity not found")]
    NotFound,
    #[error("Student is already signed up")]
    AlreadyEnrolled,
    #[error("Student is not signed up for this activity")]
    NotEnrolled,
    #[error("Activity is full")]
    ActivityFull,
}

/// Thread-safe owner of all activities.
#[derive(Debug, Default)]
pub struct ActivityRegistry {
    activities: RwLock<Activities>,
}

impl ActivityRegistry {
    pub fn new(activities: Activities) -> Self {
        Self {
            activities: RwLock::new(activities),
        }
    }

    /// Registry populated with the school's standard activity table.
    pub fn seeded() -> Self {
        Self::new(seed_activities())
    }

    /// Snapshot of every activity.
    pub async fn list(&self) -> Activities {
        self.activities.read().await.clone()
    }

    /// Add `email` to the roster of `activity_name`.
    ///
    /// Guards run in a fixed order: existence, membership, capacity.
    pub async fn enroll(&self, activity_name: &str, email: &str) -> Result<(), RegistryError> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(activity_name)
            .ok_or(RegistryError::NotFound)?;

        if activity.is_enrolled(email) {
            return Err(RegistryError::AlreadyEnrolled);
        }
        if activity.is_full() {
            return Err(RegistryError::ActivityFull);
        }

        activity.participants.push(email.to_string());
        Ok(())
    }

    /// Remove `email` from the roster of `activity_name`.
    pub async fn unenroll(&self, activity_name: &str, email: &str) -> Result<(), RegistryError> {
        let mut activities = self.activities.write().await;
        let activity = activities
            .get_mut(activity_name)
            .ok_or(RegistryError::NotFound)?;

        let position = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(RegistryError::NotEnrolled)?;

        activity.participants.remove(position);
        Ok(())
    }
}

/// The activity table the server starts with.
pub fn seed_activities() -> Activities {
    [
        (
            "Chess Club",
            Activity::new(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
            )
            .with_participants(["michael@mergington.edu", "daniel@mergington.edu"]),
        ),
        (
            "Programming Class",
            Activity::new(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
            )
            .with_participants(["emma@mergington.edu", "sophia@mergington.edu"]),
        ),
        (
            "Gym Class",
            Activity::new(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
            )
            .with_participants(["john@mergington.edu", "olivia@mergington.edu"]),
        ),
        (
            "Soccer Team",
            Activity::new(
                "Join the school soccer team and compete in matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
            )
            .with_participants(["liam@mergington.edu", "noah@mergington.edu"]),
        ),
        (
            "Basketball Team",
            Activity::new(
                "Practice and play basketball with the school team",
                "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
                15,
            )
            .with_participants(["ava@mergington.edu", "mia@mergington.edu"]),
        ),
        (
            "Art Club",
            Activity::new(
                "Explore your creativity through painting and drawing",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
            )
            .with_participants(["amelia@mergington.edu", "harper@mergington.edu"]),
        ),
        (
            "Drama Club",
            Activity::new(
                "Act, direct, and produce plays and performances",
                "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
                20,
            )
            .with_participants(["ella@mergington.edu", "scarlett@mergington.edu"]),
        ),
        (
            "Math Club",
            Activity::new(
                "Solve challenging problems and participate in math competitions",
                "Tuesdays, 3:30 PM - 4:30 PM",
                10,
            )
            .with_participants(["james@mergington.edu", "benjamin@mergington.edu"]),
        ),
        (
            "Debate Team",
            Activity::new(
                "Develop public speaking and argumentation skills",
                "Fridays, 4:00 PM - 5:30 PM",
                12,
            )
            .with_participants(["charlotte@mergington.edu", "henry@mergington.edu"]),
        ),
    ]
    .into_iter()
    .map(|(name, activity)| (name.to_string(), activity))
    .collect()
}
