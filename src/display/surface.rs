// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use crate::{classifier::Zone,
            delivery::DeliveryRecord,
            elapsed::ElapsedTime,
            geo::Distance};

use chrono::{DateTime, Utc};
use eyre::Result;
use std::io::Write;


const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const BG_RED: &str = "\x1b[41m";
const BG_GREEN: &str = "\x1b[42m";
const RESET: &str = "\x1b[0m";
const SEPARATOR: &str = "--------------------------------";


#[derive(Clone, Copy, Debug, PartialEq)]
/// A record paired with the zone it was classified into.
pub struct RenderedDelivery<'a> {
  pub record: &'a DeliveryRecord,
  pub zone:   Zone,
}


/// Anything that can show a classified list of deliveries.
pub trait RenderSurface: Send {
  /// Shows one frame. `now` is the instant elapsed times are computed for.
  fn render(&mut self,
            deliveries: &[RenderedDelivery],
            now: DateTime<Utc>)
            -> Result<()>;
}


#[derive(Debug)]
/// Writes every delivery as a block of labeled lines, red or green
/// background depending on its zone. Without colors, each block starts with
/// a `[red]` or `[green]` tag instead.
pub struct TerminalSurface<W> {
  out:     W,
  colored: bool,
}

impl<W: Write + Send> TerminalSurface<W> {
  pub fn new(out: W, colored: bool) -> Self {
    Self { out, colored }
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  fn write_block(&mut self,
                 delivery: &RenderedDelivery,
                 now: DateTime<Utc>)
                 -> Result<()> {
    let record = delivery.record;
    let distance = Distance::between(record.merchant().location,
                                     record.customer().location);
    let elapsed = ElapsedTime::between(record.created_at(), now);

    let lines = [record.customer().name.clone(),
                 record.merchant().name.clone(),
                 format!("DISTANCE: {}km", distance),
                 record.created_at_raw().to_owned(),
                 format!("ELAPSED TIME: {}", elapsed)];

    if self.colored {
      let background = match delivery.zone {
        Zone::Red => BG_RED,
        Zone::Green => BG_GREEN,
      };
      for line in lines {
        writeln!(self.out, "{}{}{}", background, line, RESET)?;
      }
    } else {
      let tag = match delivery.zone {
        Zone::Red => "[red]",
        Zone::Green => "[green]",
      };
      writeln!(self.out, "{}", tag)?;
      for line in lines {
        writeln!(self.out, "{}", line)?;
      }
    }

    writeln!(self.out, "{}", SEPARATOR)?;
    Ok(())
  }
}

impl<W: Write + Send> RenderSurface for TerminalSurface<W> {
  fn render(&mut self,
            deliveries: &[RenderedDelivery],
            now: DateTime<Utc>)
            -> Result<()> {
    if self.colored {
      write!(self.out, "{}", CLEAR_SCREEN)?;
    }

    for delivery in deliveries {
      self.write_block(delivery, now)?;
    }

    self.out.flush()?;
    Ok(())
  }
}

// fin --------------------------------------------------------------------- //
