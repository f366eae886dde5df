//! List site content

use anyhow::Result;

use crate::content::display::{audience_display_name, category_display_name};
use crate::content::Post;
use crate::helpers::short_date;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, role: Option<&str>) -> Result<()> {
    let repository = site.repository()?;

    match content_type {
        "post" | "posts" => {
            let posts = repository.all_posts(role)?;
            match role {
                Some(role) => println!("Posts visible to {} ({}):", role, posts.len()),
                None => println!("Posts ({}):", posts.len()),
            }
            print_posts(&posts);
        }
        "featured" => {
            let posts = repository.featured_posts()?;
            println!("Featured posts ({}):", posts.len());
            print_posts(&posts);
        }
        "category" | "categories" => {
            let categories = repository.all_categories()?;
            let posts = repository.all_posts(None)?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                let count = posts.iter().filter(|p| p.has_category(&category)).count();
                println!(
                    "  {} - {} ({})",
                    category,
                    category_display_name(&category),
                    count
                );
            }
        }
        "audience" | "audiences" => {
            let audiences = repository.all_audiences()?;
            let posts = repository.all_posts(None)?;
            println!("Audiences ({}):", audiences.len());
            for audience in audiences {
                let count = posts
                    .iter()
                    .filter(|p| p.audience.as_str() == audience)
                    .count();
                println!(
                    "  {} - {} ({})",
                    audience,
                    audience_display_name(&audience),
                    count
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, featured, category, audience",
                content_type
            );
        }
    }

    Ok(())
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        println!(
            "  {} - {} [{}] {}",
            short_date(post.pub_date.as_ref()),
            post.title,
            post.slug,
            post.audience
        );
    }
}
