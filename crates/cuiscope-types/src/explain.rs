//! Explain registry for controls.
//!
//! Maps control IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a control.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub control_id: &'static str,
    /// Short control title.
    pub title: &'static str,
    /// Control family name.
    pub family: &'static str,
    /// What the control requires.
    pub description: &'static str,
    /// How to close a gap.
    pub remediation: &'static str,
    /// Evidence an assessor typically asks for.
    pub evidence: &'static [&'static str],
}

/// Look up an explanation by control id (case-insensitive).
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    let id = identifier.trim().to_ascii_uppercase();
    match id.as_str() {
        ids::CONTROL_AC_1_001 => Some(explain_ac_1_001()),
        ids::CONTROL_AC_1_002 => Some(explain_ac_1_002()),
        ids::CONTROL_AC_2_005 => Some(explain_ac_2_005()),
        ids::CONTROL_AC_2_006 => Some(explain_ac_2_006()),
        ids::CONTROL_AT_2_056 => Some(explain_at_2_056()),
        ids::CONTROL_AU_2_041 => Some(explain_au_2_041()),
        ids::CONTROL_AU_2_042 => Some(explain_au_2_042()),
        ids::CONTROL_CM_2_061 => Some(explain_cm_2_061()),
        ids::CONTROL_CM_2_062 => Some(explain_cm_2_062()),
        ids::CONTROL_IA_3_083 => Some(explain_ia_3_083()),
        ids::CONTROL_IA_3_085 => Some(explain_ia_3_085()),
        ids::CONTROL_MP_2_119 => Some(explain_mp_2_119()),
        ids::CONTROL_SC_3_177 => Some(explain_sc_3_177()),
        ids::CONTROL_SC_3_180 => Some(explain_sc_3_180()),
        ids::CONTROL_SC_3_183 => Some(explain_sc_3_183()),
        _ => None,
    }
}

/// List all known control IDs.
pub fn all_control_ids() -> &'static [&'static str] {
    &[
        ids::CONTROL_AC_1_001,
        ids::CONTROL_AC_1_002,
        ids::CONTROL_AC_2_005,
        ids::CONTROL_AC_2_006,
        ids::CONTROL_AT_2_056,
        ids::CONTROL_AU_2_041,
        ids::CONTROL_AU_2_042,
        ids::CONTROL_CM_2_061,
        ids::CONTROL_CM_2_062,
        ids::CONTROL_IA_3_083,
        ids::CONTROL_IA_3_085,
        ids::CONTROL_MP_2_119,
        ids::CONTROL_SC_3_177,
        ids::CONTROL_SC_3_180,
        ids::CONTROL_SC_3_183,
    ]
}

const FAMILY_AC: &str = "Access Control";
const FAMILY_AT: &str = "Awareness and Training";
const FAMILY_AU: &str = "Audit and Accountability";
const FAMILY_CM: &str = "Configuration Management";
const FAMILY_IA: &str = "Identification and Authentication";
const FAMILY_MP: &str = "Media Protection";
const FAMILY_SC: &str = "System and Communications Protection";

fn explain_ac_1_001() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AC_1_001,
        title: "Limit system access to authorized users",
        family: FAMILY_AC,
        description: "\
Access to systems that process, store, or transmit FCI or CUI is limited to
authorized users, processes acting on their behalf, and authorized devices.
This includes remote access paths and third-party or personal devices.",
        remediation: "\
Maintain a documented list of authorized users per in-scope system. Remove
accounts promptly at offboarding. Route remote access through a VPN that
enforces MFA, and keep personal devices out of the boundary or under MDM.",
        evidence: &[
            "authorized user list",
            "offboarding tickets",
            "VPN and remote access configuration",
        ],
    }
}

fn explain_ac_1_002() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AC_1_002,
        title: "Limit access to permitted transactions and functions",
        family: FAMILY_AC,
        description: "\
Users may only perform the transactions and functions their role allows.
Privileged functions are restricted to dedicated administrative accounts.",
        remediation: "\
Separate administrator accounts from day-to-day accounts and grant privileged
rights only to the administrative identities.",
        evidence: &["account inventory with role mapping", "group membership exports"],
    }
}

fn explain_ac_2_005() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AC_2_005,
        title: "Provide privacy and security notices",
        family: FAMILY_AC,
        description: "\
Users of CUI systems are shown privacy and security notices consistent with
applicable CUI rules, typically backed by an acceptable use policy.",
        remediation: "\
Publish a written acceptable use policy for CUI systems and display a logon
banner that references it.",
        evidence: &["acceptable use policy", "logon banner screenshot"],
    }
}

fn explain_ac_2_006() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AC_2_006,
        title: "Limit use of portable storage devices on external systems",
        family: FAMILY_AC,
        description: "\
Portable storage and external parties that receive CUI are controlled. Flow
down applies to subcontractors handling CUI.",
        remediation: "\
Block or technically restrict removable media on CUI systems, and confirm that
subcontractors receiving CUI hold CMMC certification or equivalent documented
controls.",
        evidence: &["device control policy", "subcontractor certification records"],
    }
}

fn explain_at_2_056() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AT_2_056,
        title: "Security awareness for all users",
        family: FAMILY_AT,
        description: "\
Managers, administrators, and users of CUI systems are made aware of the
security risks of their activities and the applicable policies.",
        remediation: "\
Run documented security awareness training at least annually and keep
completion records.",
        evidence: &["training curriculum", "completion records"],
    }
}

fn explain_au_2_041() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AU_2_041,
        title: "Ensure user actions can be traced",
        family: FAMILY_AU,
        description: "\
Audit records of user activity on CUI systems are created so that actions can
be traced to individual users.",
        remediation: "\
Enable event logging (Windows event logs, auditd) on every in-scope system and
protect logs from modification.",
        evidence: &["logging configuration", "sample audit records"],
    }
}

fn explain_au_2_042() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_AU_2_042,
        title: "Create and retain audit logs",
        family: FAMILY_AU,
        description: "\
Audit logs are created, retained, and monitored to enable detection and
investigation of unlawful or unauthorized activity.",
        remediation: "\
Forward logs to a central collector or SIEM with alerting and a defined
retention period.",
        evidence: &["SIEM configuration", "retention policy", "alert samples"],
    }
}

fn explain_cm_2_061() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_CM_2_061,
        title: "Establish and maintain baseline configurations",
        family: FAMILY_CM,
        description: "\
Baseline configurations and documentation of the system boundary are
maintained. For CMMC Level 2 this is anchored in the System Security Plan and
the SPRS self-assessment.",
        remediation: "\
Write a System Security Plan covering the boundary and each requirement,
maintain network and data flow diagrams, and submit a NIST SP 800-171
self-assessment score to SPRS.",
        evidence: &["System Security Plan", "network diagrams", "SPRS submission"],
    }
}

fn explain_cm_2_062() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_CM_2_062,
        title: "Maintain a system component inventory",
        family: FAMILY_CM,
        description: "\
An accurate inventory of hardware, software, and firmware within the
assessment boundary is maintained.",
        remediation: "\
Keep a current asset inventory that identifies which systems handle CUI or FCI.",
        evidence: &["asset inventory export"],
    }
}

fn explain_ia_3_083() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_IA_3_083,
        title: "Use multifactor authentication",
        family: FAMILY_IA,
        description: "\
Multifactor authentication is required for local and network access to
privileged accounts and for network access to non-privileged accounts on CUI
systems.",
        remediation: "\
Enforce MFA for every account that can reach CUI, local and remote, and back it
with a password policy aligned to NIST SP 800-63B.",
        evidence: &["identity provider MFA policy", "password policy"],
    }
}

fn explain_ia_3_085() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_IA_3_085,
        title: "Employ replay-resistant authentication",
        family: FAMILY_IA,
        description: "\
Network access to privileged and non-privileged accounts uses
replay-resistant authentication mechanisms.",
        remediation: "\
Do not expose RDP or SSH directly. Require a VPN with MFA and logging for all
remote access, or disallow remote access.",
        evidence: &["VPN configuration", "firewall rules for remote access ports"],
    }
}

fn explain_mp_2_119() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_MP_2_119,
        title: "Protect and control system media containing CUI",
        family: FAMILY_MP,
        description: "\
Paper and digital media containing CUI are physically controlled and securely
stored.",
        remediation: "\
Restrict removable media through policy and technical controls, and label and
store CUI media securely.",
        evidence: &["media protection policy", "device control configuration"],
    }
}

fn explain_sc_3_177() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_SC_3_177,
        title: "Employ FIPS-validated cryptography to protect CUI",
        family: FAMILY_SC,
        description: "\
CUI is protected with FIPS 140-validated cryptography when stored and when
transmitted.",
        remediation: "\
Encrypt every CUI storage location (full-disk, file share, cloud tenant) and
use TLS 1.2+ or S/MIME for every transmission path.",
        evidence: &["encryption configuration", "FIPS validation certificates"],
    }
}

fn explain_sc_3_180() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_SC_3_180,
        title: "Architectural designs that promote security",
        family: FAMILY_SC,
        description: "\
The architecture separates CUI systems from the rest of the environment. Flat
networks and shared services bring every connected system into scope.",
        remediation: "\
Isolate CUI processing in an enclave or dedicated network segment, and keep
identity, file, and management services for the enclave separate from the
corporate environment.",
        evidence: &["network segmentation diagram", "VLAN / firewall configuration"],
    }
}

fn explain_sc_3_183() -> Explanation {
    Explanation {
        control_id: ids::CONTROL_SC_3_183,
        title: "Deny network traffic by default",
        family: FAMILY_SC,
        description: "\
Network communications traffic is denied by default and allowed by exception
at the boundary.",
        remediation: "\
Place CUI systems behind a firewall with a default-deny ruleset for ingress and
egress.",
        evidence: &["firewall ruleset"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_control_has_an_explanation() {
        for id in all_control_ids() {
            let exp = lookup_explanation(id).expect("explanation");
            assert_eq!(exp.control_id, *id);
            assert!(!exp.title.is_empty());
            assert!(!exp.remediation.is_empty());
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup_explanation("sc.3.177").is_some());
        assert!(lookup_explanation(" SC.3.177 ").is_some());
    }

    #[test]
    fn unknown_control_is_none() {
        assert!(lookup_explanation("XX.9.999").is_none());
    }
}
