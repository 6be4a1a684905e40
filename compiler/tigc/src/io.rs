//! Reading source files and writing output

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use anyhow::Context;

/// Read the whole input, from stdin if `path` is `-`
///
/// Returns the name to show for the input along with its contents.
pub fn read_input(path: &Path) -> anyhow::Result<(String, String)> {
    let mut content = String::new();

    if path.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut content)
            .context("could not read from stdin")?;
        return Ok(("<stdin>".to_string(), content));
    }

    fs::File::open(path)
        .and_then(|mut file| file.read_to_string(&mut content))
        .with_context(|| format!("could not read `{}`", path.display()))?;
    Ok((path.display().to_string(), content))
}

/// Open the output, which is stdout if `path` is `-`
pub fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    Ok(if path.as_os_str() == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(path)
                .with_context(|| format!("could not open `{}` for writing", path.display()))?,
        )
    })
}
