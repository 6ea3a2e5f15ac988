#[macro_use]
extern crate log;

mod cli;
mod error;
mod grammar;

use std::{
    error::Error as _,
    fs::{self, File},
    io::{self, BufWriter, Write},
    time::Instant,
};

use armdis::{Decoder, Walker};

use crate::{cli::Invocation, error::Error};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Status {
    /// Nothing was attempted or an input/output file was unusable.
    Aborted,
    Finished,
}

fn read_input(path: &str) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::Input {
        path: path.to_owned(),
        source,
    })
}

fn create_output(path: &str) -> Result<BufWriter<File>, Error> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::Output {
            path: path.to_owned(),
            source,
        })
}

fn report<W: Write>(out: &mut W, err: Error) -> io::Result<()> {
    if let Some(source) = err.source() {
        debug!("{source}");
    }
    writeln!(out, "[ERROR]: {err}")
}

fn run<W: Write>(invocation: Invocation, out: &mut W) -> io::Result<Status> {
    match invocation {
        Invocation::Invalid => {
            writeln!(out, "Nothing was done")?;
            return Ok(Status::Aborted);
        }
        Invocation::SingleCode { code, options } => {
            Walker::new(Decoder::new(), options).print_one(code, out)?;
        }
        Invocation::ToStream {
            input,
            range,
            options,
        } => {
            let data = match read_input(&input) {
                Ok(data) => data,
                Err(err) => {
                    report(out, err)?;
                    return Ok(Status::Aborted);
                }
            };
            writeln!(out, "[INFO]: Starting disassembly of \"{input}\".")?;
            let walker = Walker::new(Decoder::new(), options);
            match walker.listing(&data, range, out) {
                Ok(_) => writeln!(out, "\n[INFO]: Completed successfully \"{input}\".")?,
                Err(err) => report(out, err.into())?,
            }
        }
        Invocation::ToFile {
            input,
            output,
            range,
            options,
        } => {
            let data = match read_input(&input) {
                Ok(data) => data,
                Err(err) => {
                    report(out, err)?;
                    return Ok(Status::Aborted);
                }
            };
            let mut file = match create_output(&output) {
                Ok(file) => file,
                Err(err) => {
                    report(out, err)?;
                    return Ok(Status::Aborted);
                }
            };
            writeln!(out, "Starting disassembly of \"{input}\".")?;
            let walker = Walker::new(Decoder::new(), options);
            match walker.listing(&data, range, &mut file) {
                Ok(outcome) => {
                    info!("{} lines, {} unknown", outcome.lines, outcome.unknown);
                    writeln!(out, "Successfully disassembled \"{input}\" to \"{output}\".")?
                }
                Err(err) => report(out, err.into())?,
            }
        }
    }
    Ok(Status::Finished)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let start = Instant::now();
    let tokens = cli::parse_cli();
    let invocation = cli::resolve(&tokens);
    debug!("{invocation:?}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if run(invocation, &mut out)? == Status::Finished {
        let elapsed = start.elapsed().as_millis();
        writeln!(out, "[INFO]: Completed in: {elapsed} ms")?;
    }
    out.flush()?;

    Ok(())
}
