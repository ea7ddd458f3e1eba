//! Terminal rendering for command results.

#![allow(clippy::print_stdout)]

use mercado_core::{ContactCard, Product};
use mercado_storefront::discovery::{DiscoverySnapshot, Facet};
use mercado_storefront::pages::{
    BlogIndexPage, BlogPostPage, CommunitiesPage, HomePage, PostView, ProductPage,
    StoreProductsPage, StoresPage,
};
use serde::Serialize;
use serde_json::json;

use crate::commands::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub const fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "#{:<5} {:<34} {:>10}  [{}]  {}",
        product.id,
        product.title,
        product.price.display(),
        product.category,
        product.store_name
    )
}

fn facet_line(facets: &[Facet], selected: Option<&str>) -> String {
    facets
        .iter()
        .map(|f| {
            if f.category() == selected {
                format!("[{}]", f.label())
            } else {
                f.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn contact_lines(card: &ContactCard) {
    println!("Contacto ({}): {}", card.kind.label(), card.name);
    if let Some(email) = &card.email {
        println!("  Email: {email}");
    }
    if let Some(link) = card.whatsapp_link() {
        println!("  WhatsApp: {link}");
    }
}

pub fn feed(snapshot: &DiscoverySnapshot, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(snapshot);
    }

    println!("{}", facet_line(&snapshot.facets, snapshot.category.as_deref()));
    if !snapshot.search.is_empty() {
        println!("Búsqueda: {}", snapshot.search);
    }
    for product in &snapshot.items {
        println!("{}", product_line(product));
    }
    if let Some(error) = &snapshot.error {
        println!("{error}");
    }
    println!(
        "{} de {} productos (página {} de {}){}",
        snapshot.items.len(),
        snapshot.total_count,
        snapshot.page,
        snapshot.total_pages,
        if snapshot.has_more { ", hay más" } else { "" }
    );
    Ok(())
}

pub fn home(page: &HomePage, format: Format) -> Result<(), CliError> {
    let results = page.listing.current();
    let facets = page.listing.facets();

    if format == Format::Json {
        return print_json(&json!({
            "community": page.community,
            "store": page.store,
            "contact": page.contact,
            "stores": page.stores_menu,
            "facets": facets,
            "results": results,
        }));
    }

    match &page.store {
        Some(store) => println!("{} ({})", store.name, store.dni),
        None => println!("{}", page.community.display_name()),
    }
    contact_lines(&page.contact);
    if !page.stores_menu.is_empty() {
        let names: Vec<_> = page.stores_menu.iter().map(|s| s.name.as_str()).collect();
        println!("Tiendas: {}", names.join(", "));
    }
    println!("{}", facet_line(&facets, page.listing.filter().selected_category()));

    if results.items.is_empty() {
        println!("No se encontraron productos que coincidan con tu búsqueda.");
        return Ok(());
    }
    for product in &results.items {
        println!("{}", product_line(product));
    }
    println!("Página {} de {}", results.current_page, results.total_pages);
    Ok(())
}

pub fn product(page: &ProductPage, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(&json!({
            "product": page.product,
            "community": page.community,
            "store": page.store,
            "contact": page.contact,
            "whatsapp": page.whatsapp_link(),
            "storeLink": page.store_link,
        }));
    }

    let product = &page.product;
    println!("{} - {}", product.title, product.price.display());
    println!("{} ({})", product.store_name, product.store_dni);
    if !product.long_description.is_empty() {
        println!("{}", product.long_description);
    } else if !product.description.is_empty() {
        println!("{}", product.description);
    }
    for image in &product.images {
        println!("  {image}");
    }
    if let Some(link) = page.whatsapp_link() {
        println!("WhatsApp: {link}");
    }
    if let Some(card) = &page.contact {
        contact_lines(card);
    }
    println!("Tienda: {}", page.store_link);
    Ok(())
}

fn post_header(post: &PostView) {
    println!("{}", post.title);
    println!("{} | {}", post.author, post.date);
    if !post.tags.is_empty() {
        println!("Etiquetas: {}", post.tags.join(", "));
    }
}

pub fn blog_index(page: &BlogIndexPage, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(page);
    }
    if page.posts.is_empty() {
        println!("No hay artículos.");
        return Ok(());
    }
    for post in &page.posts {
        post_header(post);
        println!("{}", post.summary);
        println!("Leer artículo: {}", post.link);
        println!();
    }
    Ok(())
}

pub fn blog_post(page: &BlogPostPage, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(page);
    }
    post_header(&page.post);
    println!();
    for paragraph in &page.paragraphs {
        println!("{paragraph}");
        println!();
    }
    if !page.recent.is_empty() {
        println!("Artículos recientes:");
        for post in &page.recent {
            println!("  {} ({})", post.title, post.link);
        }
    }
    Ok(())
}

pub fn communities(page: &CommunitiesPage, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(page);
    }
    for card in &page.communities {
        println!(
            "{:<24} {:<10} {}",
            card.community.display_name(),
            card.status,
            card.link
        );
    }
    Ok(())
}

pub fn stores(page: &StoresPage, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        return print_json(page);
    }
    println!("Tiendas en {}", page.community.display_name());
    if page.is_empty() {
        println!("No hay tiendas disponibles en esta comunidad.");
    }
    for (store, link) in &page.stores {
        println!("{:<28} {}", store.name, link);
        for (platform, url) in store.social_links() {
            println!("  {platform}: {url}");
        }
    }
    Ok(())
}

pub fn store_products(view: &StoreProductsPage, format: Format) -> Result<(), CliError> {
    let results = view.results();

    if format == Format::Json {
        return print_json(&json!({
            "store": view.store(),
            "search": view.search_term(),
            "error": view.error_message(),
            "results": results,
        }));
    }

    match view.store() {
        Some(store) => println!("{} ({})", store.name, store.dni),
        None => println!("{}", view.store_id()),
    }
    if let Some(message) = view.error_message() {
        println!("{message}");
        return Ok(());
    }
    for product in &results.items {
        println!("{}", product_line(product));
    }
    println!(
        "Página {} de {} ({} productos)",
        results.current_page, results.total_pages, results.total_count
    );
    Ok(())
}
