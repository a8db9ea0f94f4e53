//! Rate identifiers and their presentation attributes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// The closed set of rates this tool knows how to fetch and draw.
///
/// `MroFixed` and `MroVariable` are the two historical tender forms of the main
/// refinancing rate. They only exist until the table merge folds them into `Mro`.
///
/// Serde goes through [`FromStr`] and [`Rate::name`], so config keys and
/// `str::parse` accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rate {
    MroFixed,
    MroVariable,
    Mro,
    Dfr,
    Mlf,
    Eonia,
    Estr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateClass {
    Policy,
    Reference,
}

impl Rate {
    /// Policy rates in display order.
    pub const POLICY: [Rate; 3] = [Rate::Mro, Rate::Dfr, Rate::Mlf];

    /// Reference rates in display order.
    pub const REFERENCE: [Rate; 2] = [Rate::Estr, Rate::Eonia];

    pub fn name(&self) -> &'static str {
        match self {
            Rate::MroFixed => "MRO (Fixed Rate)",
            Rate::MroVariable => "MRO (Variable Rate)",
            Rate::Mro => "MRO",
            Rate::Dfr => "DFR",
            Rate::Mlf => "MLF",
            Rate::Eonia => "EONIA",
            Rate::Estr => "€STR",
        }
    }

    /// Returns `None` for the MRO sub-series, which are never displayed on their own.
    pub fn class(&self) -> Option<RateClass> {
        match self {
            Rate::Mro | Rate::Dfr | Rate::Mlf => Some(RateClass::Policy),
            Rate::Estr | Rate::Eonia => Some(RateClass::Reference),
            Rate::MroFixed | Rate::MroVariable => None,
        }
    }

    /// Line colour for reference rates. Policy rates use the chart palette.
    pub fn line_color(&self) -> Option<&'static str> {
        match self {
            Rate::Estr => Some("rgba(240,128,128,0.8)"),
            Rate::Eonia => Some("rgba(176,196,222,0.8)"),
            _ => None,
        }
    }

    /// EONIA stopped being published in January 2022.
    pub fn is_discontinued(&self) -> bool {
        matches!(self, Rate::Eonia)
    }

    pub fn default_series_key(&self) -> Option<&'static str> {
        match self {
            Rate::MroFixed => Some("FM.D.U2.EUR.4F.KR.MRR_FR.LEV"),
            Rate::MroVariable => Some("FM.D.U2.EUR.4F.KR.MRR_MBR.LEV"),
            Rate::Dfr => Some("FM.D.U2.EUR.4F.KR.DFR.LEV"),
            Rate::Mlf => Some("FM.D.U2.EUR.4F.KR.MLFR.LEV"),
            Rate::Eonia => Some("EON.D.EONIA_TO.RATE"),
            Rate::Estr => Some("EST.B.EU000A2X2A25.WT"),
            Rate::Mro => None,
        }
    }

    /// The six upstream series fetched when no configuration overrides them.
    pub fn default_series() -> BTreeMap<Rate, String> {
        [
            Rate::MroFixed,
            Rate::MroVariable,
            Rate::Dfr,
            Rate::Mlf,
            Rate::Eonia,
            Rate::Estr,
        ]
        .into_iter()
        .filter_map(|rate| rate.default_series_key().map(|key| (rate, key.to_string())))
        .collect()
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MRO (FIXED RATE)" | "MRO_FIXED" => Ok(Rate::MroFixed),
            "MRO (VARIABLE RATE)" | "MRO_VARIABLE" => Ok(Rate::MroVariable),
            "MRO" => Ok(Rate::Mro),
            "DFR" => Ok(Rate::Dfr),
            "MLF" => Ok(Rate::Mlf),
            "EONIA" => Ok(Rate::Eonia),
            "€STR" | "ESTR" => Ok(Rate::Estr),
            _ => Err(anyhow::anyhow!("Unknown rate: {}", s)),
        }
    }
}

impl TryFrom<String> for Rate {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.name().to_string()
    }
}
