//! Interactive sensor-list menu

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::warn;
use rand::Rng;

use shopsense_core::{Clock, Sensor};
use shopsense_schemas::SensorListExtender;

/// Menu loop over arbitrary input and output streams
pub struct Session<'a, C: Clock, I: BufRead, O: Write> {
    extender: &'a SensorListExtender,
    clock: &'a C,
    input: I,
    output: O,
}

impl<'a, C: Clock, I: BufRead, O: Write> Session<'a, C, I, O> {
    pub fn new(extender: &'a SensorListExtender, clock: &'a C, input: I, output: O) -> Self {
        Self { extender, clock, input, output }
    }

    /// Run until the user saves and exits (`Ok(true)`) or input ends (`Ok(false)`)
    pub fn run<R: Rng + ?Sized>(&mut self, sensors: &mut Vec<Sensor>, rng: &mut R) -> Result<bool> {
        loop {
            writeln!(self.output, "\n1. Add new sensors")?;
            writeln!(self.output, "2. Show sensor list")?;
            writeln!(self.output, "3. Reset sensor list")?;
            writeln!(self.output, "4. Save and exit")?;

            let Some(choice) = self.prompt("Choice: ")? else {
                warn!("input closed, exiting without saving");
                return Ok(false);
            };

            match choice.as_str() {
                "1" => {
                    let Some(answer) = self.prompt("Number of sensors to add: ")? else {
                        warn!("input closed, exiting without saving");
                        return Ok(false);
                    };
                    match answer.parse::<usize>() {
                        Ok(count) => {
                            let ids = self.extender.add_sensors(sensors, count, self.clock.now(), rng)?;
                            for id in ids {
                                writeln!(self.output, "Added sensor {id}")?;
                            }
                        }
                        Err(_) => writeln!(self.output, "Not a number: {answer}")?,
                    }
                }
                "2" => {
                    let listing = serde_json::to_string_pretty(sensors).context("formatting sensor list")?;
                    writeln!(self.output, "{listing}")?;
                }
                "3" => {
                    sensors.clear();
                    writeln!(self.output, "Sensor list reset.")?;
                }
                "4" => return Ok(true),
                other => writeln!(self.output, "Invalid choice: {other}")?,
            }
        }
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
