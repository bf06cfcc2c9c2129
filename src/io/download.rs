use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::io::session::Session;
use crate::types::{Product, Stack, StackError, StackResult};

const TRANSFER_TIMEOUT_SECS: u64 = 600;

/// Download one product into `dir`
///
/// Uses the product's original `fileName` unless an override is given. The
/// product must expose a resolvable `url` property.
pub fn download_product(
    product: &Product,
    dir: &Path,
    filename: Option<&str>,
    session: &Session,
) -> StackResult<PathBuf> {
    let url = product.url().ok_or_else(|| StackError::Download {
        product_id: product.display_id(),
        reason: "product has no url property".to_string(),
    })?;

    let name = filename
        .or_else(|| product.file_name())
        .ok_or_else(|| StackError::Download {
            product_id: product.display_id(),
            reason: "product has no fileName property and no override was given".to_string(),
        })?;

    download_url(url, dir, name, session)
}

/// Fetch a URL to `dir/filename` with a single blocking transfer
pub fn download_url(
    url: &str,
    dir: &Path,
    filename: &str,
    session: &Session,
) -> StackResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(TRANSFER_TIMEOUT_SECS))
        .build()?;

    log::info!("Downloading {}", url);
    let mut response = session.apply(client.get(url)).send()?;

    if !response.status().is_success() {
        return Err(StackError::Download {
            product_id: filename.to_string(),
            reason: format!("{} returned {}", url, response.status()),
        });
    }

    let path = dir.join(filename);
    let mut file = File::create(&path)?;
    let bytes = response.copy_to(&mut file)?;
    log::info!("Downloaded {} ({} bytes)", path.display(), bytes);

    Ok(path)
}

/// Download every product in a stack with a fixed-size worker pool
///
/// Returns one result per entry in stack order; a failed transfer does not
/// abort the remaining downloads.
pub fn download_stack(
    stack: &Stack,
    dir: &Path,
    session: &Session,
    workers: usize,
) -> StackResult<Vec<StackResult<PathBuf>>> {
    let workers = workers.max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| StackError::WorkerPool(e.to_string()))?;

    log::info!(
        "Downloading {} products with {} workers",
        stack.len(),
        workers
    );

    let results = pool.install(|| {
        stack
            .entries()
            .par_iter()
            .map(|entry| download_product(&entry.product, dir, None, session))
            .collect()
    });

    Ok(results)
}
