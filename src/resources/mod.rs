//! Typed mouseTube resources.
//!
//! Each entity implements [`Resource`](crate::cache::Resource) with its
//! endpoint path, update verb, relation fields and payload type, so one
//! generic [`ResourceStore`](crate::cache::ResourceStore) serves them all.

mod animal_profile;
mod contact;
mod favorite;
mod file;
mod hardware;
mod laboratory;
mod protocol;
mod recording_session;
mod reference;
mod repository;
mod software;
mod species;
mod strain;
mod study;
mod subject;

pub use animal_profile::{AnimalProfile, AnimalProfilePayload};
pub use contact::{Contact, ContactPayload};
pub use favorite::{ContentType, Favorite, FavoritePayload, FavoriteStore};
pub use file::{File, FilePayload};
pub use hardware::{Hardware, HardwarePayload};
pub use laboratory::{Laboratory, LaboratoryPayload};
pub use protocol::{
  flatten, unflatten, AnimalConditions, ContextConditions, FlatProtocol, FlatProtocolFields,
  Measurement, Protocol, ProtocolFields,
};
pub use recording_session::{RecordingSession, RecordingSessionPayload};
pub use reference::{Reference, ReferencePayload};
pub use repository::{Repository, RepositoryPayload, RepositoryStore};
pub use software::{Software, SoftwarePayload};
pub use species::{Species, SpeciesPayload};
pub use strain::{Strain, StrainPayload};
pub use study::{Study, StudyPayload};
pub use subject::{Subject, SubjectPayload, SubjectUser};

use serde::{Deserialize, Serialize};

/// Curation state shared by user-submitted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
  Draft,
  #[serde(alias = "waiting validation")]
  WaitingValidation,
  Validated,
  #[serde(other)]
  Unknown,
}
