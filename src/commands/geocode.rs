//! Geocode command implementation

use super::{open_geocoder, GlobalOptions};
use crate::cli::args::{GeocodeArgs, OutputFormat};
use crate::cli::output::{print_output, GeocodeResult};
use crate::error::{ConfigError, Result};
use crate::geocode::normalize_postcode;

/// Execute the geocode command
pub fn run_geocode(args: &GeocodeArgs, format: OutputFormat, global: &GlobalOptions) -> Result<()> {
    let config = global.finish(global.builder()?)?;

    let postcode = normalize_postcode(&args.postcode);
    if postcode.is_empty() {
        return Err(ConfigError::EmptyPostcode.into());
    }

    let geocoder = open_geocoder(&config.geocode)?;
    let coords = geocoder.try_lookup(&postcode, args.house_number.as_deref())?;

    let result = GeocodeResult::new(postcode, args.house_number.clone(), coords);
    print_output(&result, format)?;

    Ok(())
}
