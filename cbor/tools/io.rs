/*!
Files or stdin/stdout, selected by a path argument of `-`
*/

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn reader(&self) -> io::Result<Box<dyn Read>> {
        Ok(match self {
            Input::Stdin => Box::new(io::stdin().lock()),
            Input::File(path) => Box::new(fs::File::open(path)?),
        })
    }

    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.reader()?.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Fails on invalid UTF-8
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut buffer = String::new();
        self.reader()?.read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Input::Stdin,
            path => Input::File(path.into()),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()
            }
            Output::File(path) => fs::write(path, data),
        }
    }

    pub fn write_str(&self, data: &str) -> io::Result<()> {
        self.write_all(data.as_bytes())
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Output::Stdout,
            path => Output::File(path.into()),
        })
    }
}
