use strum_macros::{Display, EnumString};

/// Handle of a reference frame known to the geometry provider.
///
/// Only the identity of the frame matters to this crate, transformations between frames
/// stay inside the provider.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumString)]
pub enum ReferenceFrame {
    /// International Terrestrial Reference Frame, rotates with the Earth.
    #[strum(serialize = "ITRF")]
    Itrf,
    /// Mean equator and equinox of J2000.
    #[strum(serialize = "EME2000")]
    Eme2000,
    /// Geocentric Celestial Reference Frame.
    #[strum(serialize = "GCRF")]
    Gcrf,
}
