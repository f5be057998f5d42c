//! Stable identifiers for controls and the built-in catalog.
//!
//! Control ids follow the CMMC 1.0 practice numbering (`DOMAIN.LEVEL.NUMBER`)
//! used by the scoping questionnaire.

// Built-in catalog
pub const BUILTIN_CATALOG_ID: &str = "cmmc-l2-scoping";

// Access control
pub const CONTROL_AC_1_001: &str = "AC.1.001";
pub const CONTROL_AC_1_002: &str = "AC.1.002";
pub const CONTROL_AC_2_005: &str = "AC.2.005";
pub const CONTROL_AC_2_006: &str = "AC.2.006";

// Awareness and training
pub const CONTROL_AT_2_056: &str = "AT.2.056";

// Audit and accountability
pub const CONTROL_AU_2_041: &str = "AU.2.041";
pub const CONTROL_AU_2_042: &str = "AU.2.042";

// Configuration management
pub const CONTROL_CM_2_061: &str = "CM.2.061";
pub const CONTROL_CM_2_062: &str = "CM.2.062";

// Identification and authentication
pub const CONTROL_IA_3_083: &str = "IA.3.083";
pub const CONTROL_IA_3_085: &str = "IA.3.085";

// Media protection
pub const CONTROL_MP_2_119: &str = "MP.2.119";

// System and communications protection
pub const CONTROL_SC_3_177: &str = "SC.3.177";
pub const CONTROL_SC_3_180: &str = "SC.3.180";
pub const CONTROL_SC_3_183: &str = "SC.3.183";
