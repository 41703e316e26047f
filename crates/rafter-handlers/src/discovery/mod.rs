//! Capability discovery over handler types.
//!
//! Consumers rarely care which concrete handler they get; they care what it
//! can do. Discovery answers that: each handler type publishes a
//! [`HandlerDescriptor`] naming its canonical id, the [`RoleId`]s it
//! implements, and whether it is usable in the current environment, and a
//! [`Catalog`] answers role queries over the registered descriptors.
//!
//! There is no runtime type introspection: role membership is declared
//! explicitly through [`HandlerType::roles`], and the role vocabulary is
//! the closed [`RoleId`] enum. A backend family worth filtering on gets a
//! new variant.

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// RoleId
// ---------------------------------------------------------------------------

/// Identifies a capability role in the handler hierarchy.
///
/// Covers both axes of the hierarchy: direction ([`Source`](RoleId::Source)
/// / [`Sink`](RoleId::Sink)), payload kind ([`Frame`](RoleId::Frame),
/// [`Table`](RoleId::Table), [`Distribution`](RoleId::Distribution)), and
/// the frame refinements.
///
/// # Example
///
/// ```
/// use rafter_handlers::discovery::RoleId;
///
/// let role = RoleId::Distribution;
/// assert_eq!(role.as_str(), "distribution");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleId {
    /// Reads payloads out of a backend.
    Source,
    /// Writes payloads into a backend.
    Sink,
    /// Moves single N-dimensional arrays per unit.
    Frame,
    /// Moves record-arrays with named fields.
    Table,
    /// Moves paired bin-edges/bin-values arrays.
    Distribution,
    /// Frame refinement: 2-D frames (images, slices, planes).
    Image,
    /// Frame refinement: 3-D frames.
    Volume,
    /// Image refinement: raw tomographic data.
    Tomography,
}

impl RoleId {
    /// Returns the canonical kebab-case string for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
            Self::Frame => "frame",
            Self::Table => "table",
            Self::Distribution => "distribution",
            Self::Image => "image",
            Self::Volume => "volume",
            Self::Tomography => "tomography",
        }
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HandlerType
// ---------------------------------------------------------------------------

/// Type-level capability declaration for a concrete handler.
///
/// The provided [`id`](HandlerType::id) derives a canonical lowercase name
/// from the type's own name; [`available`](HandlerType::available) defaults
/// to `true` so a handler is assumed usable once its crate compiles.
/// Handlers with optional runtime dependencies override it to mark
/// themselves unusable without failing discovery.
pub trait HandlerType {
    /// Returns every role this handler type implements, including
    /// transitive ones (an image source lists `Image`, `Frame`, and
    /// `Source`).
    fn roles() -> &'static [RoleId];

    /// Returns `true` when the handler can be used in this environment.
    #[must_use]
    fn available() -> bool {
        true
    }

    /// Returns the canonical lowercase name of this handler type.
    #[must_use]
    fn id() -> String {
        canonical_id(std::any::type_name::<Self>())
    }

    /// Builds the descriptor discovery hands to consumers.
    #[must_use]
    fn descriptor() -> HandlerDescriptor {
        HandlerDescriptor {
            id: Self::id(),
            roles: Self::roles(),
            available: Self::available(),
        }
    }
}

/// Derives a canonical lowercase id from a fully-qualified type name.
fn canonical_id(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    let base_name = without_generics.rsplit("::").next().unwrap_or(without_generics);
    base_name.to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// HandlerDescriptor
// ---------------------------------------------------------------------------

/// Plain record describing one concrete handler type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    id: String,
    roles: &'static [RoleId],
    available: bool,
}

impl HandlerDescriptor {
    /// Returns the canonical lowercase id.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the roles the handler type implements.
    #[must_use]
    pub const fn roles(&self) -> &'static [RoleId] {
        self.roles
    }

    /// Returns `true` when the handler is usable in this environment.
    ///
    /// Discovery lists unavailable handlers rather than dropping them;
    /// callers branch on this flag.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Returns `true` when the handler implements the given role.
    #[must_use]
    pub fn implements(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` when the handler implements at least one of the
    /// given roles.
    #[must_use]
    pub fn implements_any(&self, roles: &[RoleId]) -> bool {
        roles.iter().any(|role| self.implements(*role))
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of handler descriptors.
///
/// # Example
///
/// ```
/// use rafter_handlers::discovery::{Catalog, HandlerType, RoleId};
///
/// struct HistogramReader;
///
/// impl HandlerType for HistogramReader {
///     fn roles() -> &'static [RoleId] {
///         &[RoleId::Source, RoleId::Distribution]
///     }
/// }
///
/// let mut catalog = Catalog::new();
/// catalog.register::<HistogramReader>().expect("registration succeeds");
///
/// let sources = catalog.discover(RoleId::Distribution, None);
/// assert_eq!(sources.len(), 1);
/// assert_eq!(sources.first().expect("one source").id(), "histogramreader");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<HandlerDescriptor>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a handler type's descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Catalog`] when a handler with the same id is
    /// already registered.
    pub fn register<H: HandlerType>(&mut self) -> Result<(), HandlerError> {
        let descriptor = H::descriptor();
        if self.entries.iter().any(|entry| entry.id == descriptor.id) {
            return Err(HandlerError::Catalog {
                message: format!("handler '{}' is already registered", descriptor.id),
            });
        }
        tracing::debug!(id = %descriptor.id, "registered handler type");
        self.entries.push(descriptor);
        Ok(())
    }

    /// Returns every descriptor implementing `role`, in registration order.
    ///
    /// With a filter, the result narrows to descriptors that also
    /// implement at least one role in the filter set (OR logic across the
    /// set). Unavailable handlers are included; check
    /// [`HandlerDescriptor::is_available`].
    #[must_use]
    pub fn discover(&self, role: RoleId, filter: Option<&[RoleId]>) -> Vec<&HandlerDescriptor> {
        self.entries
            .iter()
            .filter(|entry| entry.implements(role))
            .filter(|entry| filter.is_none_or(|roles| entry.implements_any(roles)))
            .collect()
    }

    /// Returns every registered descriptor, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[HandlerDescriptor] {
        &self.entries
    }

    /// Returns the number of registered handler types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no handler types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
