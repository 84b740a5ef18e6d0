//! Regime labels.
//!
//! Threshold bands that turn RISK, breadth and speculative concentration into
//! human-readable intensities, the primary regime taxonomy and the severity
//! modifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall risk appetite, from RISK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// RISK > 0.5
    FullSend,
    /// RISK > 0.05
    RiskOn,
    /// -0.05 <= RISK <= 0.05
    Chop,
    /// -0.5 <= RISK < -0.05
    RiskOff,
    /// RISK < -0.5
    Capitulation,
}

impl RiskLevel {
    pub fn from_risk(risk: f64) -> Self {
        if risk > 0.5 {
            Self::FullSend
        } else if risk > 0.05 {
            Self::RiskOn
        } else if risk >= -0.05 {
            Self::Chop
        } else if risk >= -0.5 {
            Self::RiskOff
        } else {
            Self::Capitulation
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullSend => "Full Send",
            Self::RiskOn => "Risk On",
            Self::Chop => "Chop / Indecision",
            Self::RiskOff => "Risk Off",
            Self::Capitulation => "Capitulation Mode",
        }
    }
}

/// How many assets participate, from total breadth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participation {
    Broad,
    Selective,
    Narrow,
}

impl Participation {
    pub fn from_breadth(breadth: f64) -> Self {
        if breadth >= 0.6 {
            Self::Broad
        } else if breadth >= 0.3 {
            Self::Selective
        } else {
            Self::Narrow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Broad => "Broad",
            Self::Selective => "Selective",
            Self::Narrow => "Narrow",
        }
    }
}

/// Where speculation sits, from speculative concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    CasinoLed,
    FullMarket,
    InstitutionalBid,
}

impl Structure {
    pub fn from_spec_conc(spec_conc: f64) -> Self {
        if spec_conc >= 0.6 {
            Self::CasinoLed
        } else if spec_conc >= 0.4 {
            Self::FullMarket
        } else {
            Self::InstitutionalBid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CasinoLed => "Casino Led",
            Self::FullMarket => "Full Market",
            Self::InstitutionalBid => "Institutional Bid",
        }
    }
}

/// The three intensity labels together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intensities {
    pub risk_level: RiskLevel,
    pub participation: Participation,
    pub structure: Structure,
}

impl Intensities {
    pub fn new(risk: f64, breadth: f64, spec_conc: f64) -> Self {
        Self {
            risk_level: RiskLevel::from_risk(risk),
            participation: Participation::from_breadth(breadth),
            structure: Structure::from_spec_conc(spec_conc),
        }
    }
}

/// Primary regime archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryRegime {
    /// Majors bleeding while memes carry the tape.
    SpeculativeFlight,
    /// Deep drawdown led by memes with almost no breadth.
    LiquidationMode,
    /// Healthy risk-on with wide participation.
    BroadRiskOn,
    /// Frothy risk-on concentrated in memes.
    DegenerateSend,
    /// Flat headline, midcaps leading majors.
    RotationPhase,
    /// Structural risk-off, majors weak.
    StructuralRiskOff,
    /// Positive RISK matching no archetype.
    ScattershotRiskOn,
    /// Non-positive RISK matching no archetype.
    BleedingRiskOff,
}

impl PrimaryRegime {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SpeculativeFlight => "Speculative Flight",
            Self::LiquidationMode => "Liquidation Mode",
            Self::BroadRiskOn => "Broad Risk-On",
            Self::DegenerateSend => "Degenerate Send",
            Self::RotationPhase => "Rotation Phase",
            Self::StructuralRiskOff => "Risk-Off",
            Self::ScattershotRiskOn => "Risk On (Scattershot)",
            Self::BleedingRiskOff => "Risk Off (Bleeding)",
        }
    }

    /// Empty for the fallback regimes.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SpeculativeFlight => "Shit Market, Memes Pumping",
            Self::LiquidationMode => "Alts Getting Nuked",
            Self::BroadRiskOn => "Rotation Is Real",
            Self::DegenerateSend => "Memes Running the Market",
            Self::RotationPhase => "Capital Shifting Under the Hood",
            Self::StructuralRiskOff => "Capital Hiding in BTC",
            Self::ScattershotRiskOn | Self::BleedingRiskOff => "",
        }
    }
}

impl fmt::Display for PrimaryRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Degree modifier from |RISK|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Violent,
    Heavy,
    Light,
}

impl Severity {
    /// `None` in the unmarked band 0.05 <= |RISK| <= 0.2.
    pub fn from_risk(risk: f64) -> Option<Self> {
        let magnitude = risk.abs();
        if magnitude > 0.5 {
            Some(Self::Violent)
        } else if magnitude > 0.2 {
            Some(Self::Heavy)
        } else if magnitude < 0.05 {
            Some(Self::Light)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Violent => "Violent",
            Self::Heavy => "Heavy",
            Self::Light => "Light",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
