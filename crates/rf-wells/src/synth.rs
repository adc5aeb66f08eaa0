//! Synthetic well sections.
//!
//! [`GridWellsSpec`] describes the wells of one grid and produces the
//! `INTEHEAD`/`ZWEL`/`IWEL`/`ICON`/`XCON` keywords the decoder reads,
//! so that restart blocks can be assembled without a simulator.

use chrono::{Datelike, NaiveDate};
use rf_restart::{ENDLGR, Keyword, LGR, RestartBlock};

use crate::error::{WellResult, malformed};
use crate::layout::{TYPE_ABSENT, icon, intehead, iwel, kw, xcon};
use crate::types::WellKind;

const INTEHEAD_LEN: usize = 411;
const NIWELZ: usize = 155;
const NZWELZ: usize = 3;
const NICONZ: usize = 25;
const NXCONZ: usize = 58;

#[derive(Debug, Clone)]
struct SynthWell {
    name: String,
    type_code: i32,
    /// 0-based cell and rate, m³/s.
    completions: Vec<([usize; 3], f64)>,
}

/// Well section of one grid.
#[derive(Debug, Clone)]
pub struct GridWellsSpec {
    dims: [usize; 3],
    ncwmax: Option<usize>,
    date: Option<NaiveDate>,
    header_only: bool,
    wells: Vec<SynthWell>,
}

impl GridWellsSpec {
    /// Empty section for a grid of `dims` (NX, NY, NZ).
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            ncwmax: None,
            date: None,
            header_only: false,
            wells: Vec::new(),
        }
    }

    pub fn well(mut self, name: &str, kind: WellKind, completions: &[([usize; 3], f64)]) -> Self {
        self.wells.push(SynthWell {
            name: name.to_string(),
            type_code: kind.type_code(),
            completions: completions.to_vec(),
        });
        self
    }

    pub fn producer(self, name: &str, completions: &[([usize; 3], f64)]) -> Self {
        self.well(name, WellKind::Producer, completions)
    }

    /// A declared well marked as not present in this grid.
    pub fn absent(mut self, name: &str) -> Self {
        self.wells.push(SynthWell {
            name: name.to_string(),
            type_code: TYPE_ABSENT,
            completions: Vec::new(),
        });
        self
    }

    /// Completion slots per well; defaults to the largest completion count (at least 1).
    pub fn with_ncwmax(mut self, ncwmax: usize) -> Self {
        self.ncwmax = Some(ncwmax);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Emit `INTEHEAD` alone, as simulators do for grids without wells.
    pub fn header_only(mut self) -> Self {
        self.header_only = true;
        self
    }

    fn ncwmax(&self) -> usize {
        self.ncwmax.unwrap_or_else(|| {
            self.wells
                .iter()
                .map(|w| w.completions.len())
                .max()
                .unwrap_or(0)
                .max(1)
        })
    }

    /// The keywords of this section, in write order.
    pub fn keywords(&self) -> WellResult<Vec<Keyword>> {
        let nwells = self.wells.len();
        let ncwmax = self.ncwmax();

        let mut head = vec![0i32; INTEHEAD_LEN];
        let sizes = [
            (intehead::UNIT, 1),
            (intehead::NX, self.dims[0]),
            (intehead::NY, self.dims[1]),
            (intehead::NZ, self.dims[2]),
            (intehead::NACTIV, self.dims.iter().product()),
            (intehead::NWELLS, nwells),
            (intehead::NCWMAX, ncwmax),
            (intehead::NIWELZ, NIWELZ),
            (intehead::NZWELZ, NZWELZ),
            (intehead::NICONZ, NICONZ),
            (intehead::NXCONZ, NXCONZ),
        ];
        for (item, value) in sizes {
            head[item] = to_i32(kw::INTEHEAD, value)?;
        }
        if let Some(date) = self.date {
            head[intehead::DAY] = date.day() as i32;
            head[intehead::MONTH] = date.month() as i32;
            head[intehead::YEAR] = date.year();
        }

        let head = Keyword::int(kw::INTEHEAD, head)?;
        if self.header_only {
            return Ok(vec![head]);
        }

        let mut zwel = vec![String::new(); nwells * NZWELZ];
        let mut iwel = vec![0i32; nwells * NIWELZ];
        let mut icon = vec![0i32; nwells * ncwmax * NICONZ];
        let mut xcon = vec![0f64; nwells * ncwmax * NXCONZ];

        for (w, well) in self.wells.iter().enumerate() {
            if well.completions.len() > ncwmax {
                return Err(malformed(
                    kw::IWEL,
                    format!(
                        "well {} has {} completions, NCWMAX is {ncwmax}",
                        well.name,
                        well.completions.len()
                    ),
                ));
            }
            zwel[w * NZWELZ] = well.name.clone();
            iwel[w * NIWELZ + iwel::NCONN] = to_i32(kw::IWEL, well.completions.len())?;
            iwel[w * NIWELZ + iwel::TYPE] = well.type_code;

            for (c, &(cell, rate)) in well.completions.iter().enumerate() {
                let slot = w * ncwmax + c;
                let ic = &mut icon[slot * NICONZ..(slot + 1) * NICONZ];
                ic[icon::SEQ] = to_i32(kw::ICON, c + 1)?;
                ic[icon::I] = to_i32(kw::ICON, cell[0] + 1)?;
                ic[icon::J] = to_i32(kw::ICON, cell[1] + 1)?;
                ic[icon::K] = to_i32(kw::ICON, cell[2] + 1)?;
                xcon[slot * NXCONZ + xcon::RESV_RATE] = rate;
            }
        }

        Ok(vec![
            head,
            Keyword::chars(kw::ZWEL, zwel)?,
            Keyword::int(kw::IWEL, iwel)?,
            Keyword::int(kw::ICON, icon)?,
            Keyword::double(kw::XCON, xcon)?,
        ])
    }

    /// Append this section as the main grid of `block`.
    pub fn append_to(&self, block: &mut RestartBlock) -> WellResult<()> {
        block.extend(self.keywords()?);
        Ok(())
    }

    /// Append this section as a local grid named `lgr_name`, framed by `LGR`/`ENDLGR`.
    pub fn append_lgr_to(&self, lgr_name: &str, block: &mut RestartBlock) -> WellResult<()> {
        block.push(Keyword::chars(LGR, [lgr_name])?);
        block.extend(self.keywords()?);
        block.push(Keyword::message(ENDLGR)?);
        Ok(())
    }
}

fn to_i32(keyword: &str, value: usize) -> WellResult<i32> {
    i32::try_from(value).map_err(|_| malformed(keyword, format!("{value} does not fit INTE")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_restart::KeywordData;

    #[test]
    fn keywords_follow_layout() {
        let spec = GridWellsSpec::new([4, 4, 2])
            .producer("P1", &[([0, 1, 1], 3.0), ([2, 3, 0], 1.0)])
            .absent("GHOST");
        let keywords = spec.keywords().unwrap();

        let names: Vec<&str> = keywords.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["INTEHEAD", "ZWEL", "IWEL", "ICON", "XCON"]);

        let KeywordData::Int(head) = keywords[0].data() else {
            panic!("INTEHEAD must be INTE");
        };
        assert_eq!(head[intehead::NWELLS], 2);
        assert_eq!(head[intehead::NCWMAX], 2);

        let KeywordData::Int(icon_items) = keywords[3].data() else {
            panic!("ICON must be INTE");
        };
        // second completion of P1: 1-based (3, 4, 1)
        assert_eq!(&icon_items[NICONZ..NICONZ + 4], &[2, 3, 4, 1]);
    }

    #[test]
    fn too_many_completions_rejected() {
        let spec = GridWellsSpec::new([2, 2, 2])
            .producer("P1", &[([0, 0, 0], 1.0), ([1, 0, 0], 1.0)])
            .with_ncwmax(1);
        assert!(spec.keywords().is_err());
    }

    #[test]
    fn header_only_section_has_no_well_arrays() {
        let keywords = GridWellsSpec::new([2, 2, 2]).header_only().keywords().unwrap();
        let names: Vec<&str> = keywords.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["INTEHEAD"]);
    }

    #[test]
    fn lgr_section_is_framed() {
        let mut block = RestartBlock::new(0);
        GridWellsSpec::new([2, 2, 1])
            .append_lgr_to("LGR1", &mut block)
            .unwrap();
        let names: Vec<&str> = block.keywords().iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            ["SEQNUM", "LGR", "INTEHEAD", "ZWEL", "IWEL", "ICON", "XCON", "ENDLGR"]
        );
    }
}
