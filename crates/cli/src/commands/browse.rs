//! Local dataset commands: `mercado browse`, `mercado product`, and `mercado blog`.

use mercado_core::{BlogPostId, CommunityId, ProductId, StoreId};
use mercado_storefront::catalog::Dataset;
use mercado_storefront::config::StorefrontConfig;
use mercado_storefront::pages::{load_blog, load_blog_post, load_home, load_product};
use mercado_storefront::routing::RouteParams;

use super::CliError;
use crate::output::{self, Format};

pub struct BrowseArgs {
    pub community: Option<String>,
    pub store: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: u32,
    pub seed: Option<u64>,
}

impl BrowseArgs {
    fn route(&self) -> RouteParams {
        RouteParams {
            community: self.community.as_deref().map(CommunityId::new),
            store: self.store.as_deref().map(StoreId::new),
        }
    }
}

pub async fn run(config: &StorefrontConfig, args: BrowseArgs, format: Format) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_dir).await?;
    let mut home = load_home(&dataset, &args.route(), config.page_size).into_result()?;

    if let Some(seed) = args.seed {
        home.listing.reseed(seed);
    }
    if let Some(term) = &args.search {
        home.listing.search(term);
    } else if let Some(category) = &args.category {
        home.listing.select_category(Some(category));
    }
    home.listing.go_to_page(args.page);

    output::home(&home, format)
}

pub async fn product(
    config: &StorefrontConfig,
    id: i64,
    community: Option<&str>,
    format: Format,
) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_dir).await?;
    let route = RouteParams {
        community: community.map(CommunityId::new),
        store: None,
    };
    let page = load_product(&dataset, ProductId::new(id), &route).into_result()?;

    output::product(&page, format)
}

pub async fn blog(
    config: &StorefrontConfig,
    id: Option<i64>,
    tag: Option<&str>,
    format: Format,
) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_dir).await?;
    match id {
        Some(id) => {
            let page = load_blog_post(&dataset, BlogPostId::new(id)).into_result()?;
            output::blog_post(&page, format)
        }
        None => output::blog_index(&load_blog(&dataset, tag), format),
    }
}
