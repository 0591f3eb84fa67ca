/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains some common helper functions for dealing with file I/O

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::TextEnvError;
use crate::types::*;

/// Directory entries that hold version control bookkeeping rather than documents
pub(crate) const HOUSEKEEPING_ENTRIES: &[&str; 4] = &["CVS", ".git", ".svn", ".hg"];

/// Get a file for reading or writing, this resolves relative files more intelligently
pub(crate) fn get_filepath(filename: &str, workdir: Option<&Path>) -> Result<PathBuf, TextEnvError> {
    if filename == "-" {
        //designates stdin or stdout
        return Ok(filename.into());
    }
    if filename.starts_with("https://") || filename.starts_with("http://") {
        return Err(TextEnvError::OtherError("Loading URLs is not supported"));
    }
    let path = if let Some(stripped) = filename.strip_prefix("file://") {
        PathBuf::from(stripped)
    } else {
        PathBuf::from(filename)
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        //check whether we can find one in our workdir first
        if let Some(workdir) = workdir {
            let path = workdir.join(&path);
            if path.exists() {
                //should also work with symlinks
                return Ok(path);
            }
        }

        //final fallback is simply relative to the current working directly
        // we don't test for existance here
        Ok(path)
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file(filename: &str, config: &Config) -> Result<File, TextEnvError> {
    let found_filename = get_filepath(filename, config.workdir())?;
    debug(config, || format!("open_file: {:?}", found_filename));
    File::open(found_filename.as_path()).map_err(|e| {
        TextEnvError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for reading failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn create_file(filename: &str, config: &Config) -> Result<File, TextEnvError> {
    let mut found_filename = get_filepath(filename, config.workdir())?;
    //new files are created in the workdir
    if let Some(workdir) = config.workdir() {
        if found_filename.is_relative() {
            found_filename = workdir.join(found_filename);
        }
    }
    debug(config, || format!("create_file: {:?}", found_filename));
    File::create(found_filename.as_path()).map_err(|e| {
        TextEnvError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for writing failed",
        )
    })
}

/// Auxiliary function to help open files
pub(crate) fn open_file_reader(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn BufRead>, TextEnvError> {
    if filename == "-" {
        //read from stdin
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(open_file(filename, config)?)))
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file_writer(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn Write>, TextEnvError> {
    if filename == "-" {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(create_file(filename, config)?)))
    }
}

/// Reads an entire (UTF-8) file into a string
pub(crate) fn read_to_string(path: &Path, config: &Config) -> Result<String, TextEnvError> {
    debug(config, || format!("read_to_string: {:?}", path));
    let mut text = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut text))
        .map_err(|e| {
            TextEnvError::IOError(
                e,
                path.to_string_lossy().into_owned(),
                "Reading text file failed",
            )
        })?;
    Ok(text)
}

/// Returns the final component of a path as a string, used as document identifier
pub(crate) fn file_name(path: &Path) -> Result<String, TextEnvError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TextEnvError::NotFound(
                path.to_string_lossy().into_owned(),
                "Path has no file name component",
            )
        })
}

/// Is this directory entry version control bookkeeping that loaders must skip?
pub(crate) fn is_housekeeping(name: &str) -> bool {
    HOUSEKEEPING_ENTRIES.contains(&name)
}
