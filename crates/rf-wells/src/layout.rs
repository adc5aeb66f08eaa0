//! Restart keyword names and item positions of the well section.
//!
//! Item positions are 0-based offsets into the stored arrays.

use chrono::NaiveDate;

use crate::error::{WellResult, malformed};

/// Keyword names.
pub mod kw {
    pub const INTEHEAD: &str = "INTEHEAD";
    pub const ZWEL: &str = "ZWEL";
    pub const IWEL: &str = "IWEL";
    pub const ICON: &str = "ICON";
    pub const XCON: &str = "XCON";
}

/// Items of `INTEHEAD`.
pub mod intehead {
    pub const UNIT: usize = 2;
    pub const NX: usize = 8;
    pub const NY: usize = 9;
    pub const NZ: usize = 10;
    pub const NACTIV: usize = 11;
    pub const NWELLS: usize = 16;
    pub const NCWMAX: usize = 17;
    pub const NIWELZ: usize = 24;
    pub const NZWELZ: usize = 27;
    pub const NICONZ: usize = 32;
    pub const NXCONZ: usize = 34;
    pub const DAY: usize = 64;
    pub const MONTH: usize = 65;
    pub const YEAR: usize = 66;

    /// Shortest header that holds every item above.
    pub const MIN_LEN: usize = YEAR + 1;
}

/// Items of one `IWEL` well record.
pub mod iwel {
    /// Number of completions.
    pub const NCONN: usize = 4;
    /// Well type code.
    pub const TYPE: usize = 6;
}

/// Items of one `ICON` completion record.
pub mod icon {
    /// 1-based connection sequence number; 0 for an unused slot.
    pub const SEQ: usize = 0;
    pub const I: usize = 1;
    pub const J: usize = 2;
    pub const K: usize = 3;
}

/// Items of one `XCON` completion record.
pub mod xcon {
    /// Reservoir volume rate, m³/s.
    pub const RESV_RATE: usize = 49;
}

/// Well type code of a well declared but not present in a grid.
pub const TYPE_ABSENT: i32 = 0;

/// Unit system flag of a restart header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Field,
    Lab,
    PvtM,
    Unknown(i32),
}

impl UnitSystem {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Metric,
            2 => Self::Field,
            3 => Self::Lab,
            4 => Self::PvtM,
            other => Self::Unknown(other),
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metric => write!(f, "METRIC"),
            Self::Field => write!(f, "FIELD"),
            Self::Lab => write!(f, "LAB"),
            Self::PvtM => write!(f, "PVT-M"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// Typed view of the `INTEHEAD` items used by the well decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct IntHead {
    pub unit_system: UnitSystem,
    /// Grid dimensions NX, NY, NZ.
    pub dims: [usize; 3],
    pub active_cells: usize,
    pub nwells: usize,
    /// Completion slots reserved per well.
    pub ncwmax: usize,
    pub niwelz: usize,
    pub nzwelz: usize,
    pub niconz: usize,
    pub nxconz: usize,
    /// Report date, when the stored day/month/year form a valid date.
    pub date: Option<NaiveDate>,
}

impl IntHead {
    pub fn parse(items: &[i32]) -> WellResult<Self> {
        if items.len() < intehead::MIN_LEN {
            return Err(malformed(
                kw::INTEHEAD,
                format!(
                    "{} items, at least {} required",
                    items.len(),
                    intehead::MIN_LEN
                ),
            ));
        }
        let count = |index: usize, what: &str| {
            usize::try_from(items[index])
                .map_err(|_| malformed(kw::INTEHEAD, format!("negative {what} {}", items[index])))
        };

        let head = Self {
            unit_system: UnitSystem::from_code(items[intehead::UNIT]),
            dims: [
                count(intehead::NX, "NX")?,
                count(intehead::NY, "NY")?,
                count(intehead::NZ, "NZ")?,
            ],
            active_cells: count(intehead::NACTIV, "NACTIV")?,
            nwells: count(intehead::NWELLS, "NWELLS")?,
            ncwmax: count(intehead::NCWMAX, "NCWMAX")?,
            niwelz: count(intehead::NIWELZ, "NIWELZ")?,
            nzwelz: count(intehead::NZWELZ, "NZWELZ")?,
            niconz: count(intehead::NICONZ, "NICONZ")?,
            nxconz: count(intehead::NXCONZ, "NXCONZ")?,
            date: report_date(
                items[intehead::YEAR],
                items[intehead::MONTH],
                items[intehead::DAY],
            ),
        };

        if head.nwells > 0 {
            head.check_record_sizes()?;
        }
        Ok(head)
    }

    /// Every per-well and per-completion record must reach the items we read.
    fn check_record_sizes(&self) -> WellResult<()> {
        let checks = [
            ("NIWELZ", self.niwelz, iwel::TYPE.max(iwel::NCONN) + 1),
            ("NZWELZ", self.nzwelz, 1),
            ("NICONZ", self.niconz, icon::K + 1),
            ("NXCONZ", self.nxconz, xcon::RESV_RATE + 1),
        ];
        for (what, value, min) in checks {
            if value < min {
                return Err(malformed(
                    kw::INTEHEAD,
                    format!("{what} is {value}, at least {min} required"),
                ));
            }
        }
        Ok(())
    }
}

fn report_date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
