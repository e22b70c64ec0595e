//! Built-in dataset used when storage holds no catalog yet.

use chrono::Utc;

use crate::models::{Category, Product, ProductStatus, ShowcaseProduct};

const CDN: &str = "https://store.storeimages.cdn-apple.com/4982/as-images.apple.com/is";

fn image(path: &str) -> String {
    format!("{}/{}", CDN, path)
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    price: f64,
    original_price: Option<f64>,
    images: &[&str],
    category: &str,
    status: ProductStatus,
    colors: &[&str],
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        original_price,
        images: images.iter().map(|path| image(path)).collect(),
        category: category.to_string(),
        status,
        colors: Some(colors.iter().map(|c| c.to_string()).collect()),
        is_showcase: false,
        showcase_image: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn default_products() -> Vec<Product> {
    use ProductStatus::{Available, ComingSoon};

    vec![
        product(
            "1",
            "iPhone 15 Pro",
            "The most advanced iPhone, with the A17 Pro chip, a Pro camera system and a titanium design",
            4_299_000.0,
            Some(4_599_000.0),
            &[
                "iphone-15-pro-finish-select-202309-6-1inch-naturaltitanium?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1692895395658",
                "iphone-15-pro-finish-select-202309-6-1inch-bluetitanium?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1692895395625",
            ],
            "1",
            Available,
            &["Natural Titanium", "Blue Titanium", "White Titanium", "Black Titanium"],
        ),
        product(
            "2",
            "iPad Air 11\"",
            "iPad Air with the M2 chip, an 11-inch Liquid Retina display and Apple Pencil Pro support",
            2_199_000.0,
            Some(2_399_000.0),
            &[
                "ipad-air-finish-select-gallery-202405-11inch-blue?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1713920820026",
                "ipad-air-finish-select-gallery-202405-11inch-purple?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1713920820059",
            ],
            "2",
            Available,
            &["Blue", "Purple", "Starlight", "Pink"],
        ),
        product(
            "3",
            "AirPods Pro (2nd generation)",
            "Active noise cancellation, transparency mode and personalized spatial audio",
            949_000.0,
            Some(1_099_000.0),
            &[
                "MQD83?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1660803972361",
                "airpods-pro-2nd-gen-hero-202209?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1660012491833",
            ],
            "3",
            Available,
            &["White"],
        ),
        product(
            "4",
            "MacBook Pro 14\"",
            "A powerful laptop with the M3 Pro chip, a Liquid Retina XDR display and up to 18 hours of battery",
            8_499_000.0,
            Some(8_999_000.0),
            &[
                "mbp14-spacegray-select-202310?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1697311054290",
                "mbp14-silver-select-202310?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1697311054387",
            ],
            "4",
            Available,
            &["Space Gray", "Silver"],
        ),
        product(
            "5",
            "iPhone 15",
            "iPhone 15 with a 48 MP camera, USB-C and Dynamic Island",
            3_299_000.0,
            None,
            &[
                "iphone-15-finish-select-202309-6-1inch-pink?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1692895781054",
                "iphone-15-finish-select-202309-6-1inch-blue?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1692895781080",
            ],
            "1",
            Available,
            &["Pink", "Blue", "Green", "Yellow", "Black"],
        ),
        product(
            "6",
            "Apple Watch Series 9",
            "Smartwatch with the S9 chip, a brighter display and new finger gestures",
            1_499_000.0,
            Some(1_699_000.0),
            &[
                "watch-case-45-aluminum-pink-nc-s9_VW_PF+watch-face-45-aluminum-pink-s9_VW_PF?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1693248280535",
                "watch-case-45-aluminum-midnight-nc-s9_VW_PF+watch-face-45-aluminum-midnight-s9_VW_PF?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1693248280566",
            ],
            "3",
            ComingSoon,
            &["Pink", "Midnight", "Starlight", "(PRODUCT)RED"],
        ),
        product(
            "7",
            "iPad Pro 12.9\"",
            "iPad Pro with the M2 chip, a 12.9-inch Liquid Retina XDR display and Apple Pencil support",
            4_299_000.0,
            None,
            &[
                "ipad-pro-12-select-wifi-spacegray-202210?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1664411207213",
                "ipad-pro-12-select-wifi-silver-202210?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1664411207090",
            ],
            "2",
            ComingSoon,
            &["Space Gray", "Silver"],
        ),
        product(
            "8",
            "AirPods Max",
            "Premium headphones with active noise cancellation, spatial audio and up to 20 hours of playback",
            2_199_000.0,
            Some(2_399_000.0),
            &[
                "airpods-max-select-spacegray-202011?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1603996647635",
                "airpods-max-select-pink-202011?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1603996647635",
            ],
            "3",
            Available,
            &["Space Gray", "Silver", "Pink", "Green", "Sky Blue"],
        ),
        product(
            "9",
            "MacBook Air 15\"",
            "Ultralight laptop with the M2 chip, a 15.3-inch Liquid Retina display and up to 18 hours of battery",
            5_499_000.0,
            None,
            &[
                "mba15-midnight-select-202306?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1684518479433",
                "mba15-starlight-select-202306?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1684518479705",
            ],
            "4",
            Available,
            &["Midnight", "Starlight", "Silver", "Space Gray"],
        ),
        product(
            "10",
            "Mac Studio",
            "A powerful desktop with the M2 Max or M2 Ultra chip for creative professionals",
            7_999_000.0,
            Some(8_499_000.0),
            &["mac-studio-select-202306?wid=5120&hei=2880&fmt=p-jpg&qlt=80&.v=1684345161143"],
            "4",
            ComingSoon,
            &["Silver"],
        ),
    ]
}

pub fn default_categories() -> Vec<Category> {
    [
        ("1", "iPhone", "iPhone smartphones with the latest Apple technology"),
        ("2", "iPad", "iPad tablets for creativity, productivity and entertainment"),
        ("3", "Accessories", "AirPods, Apple Watch and other Apple accessories"),
        ("4", "Mac", "MacBooks, Mac Studio and Apple computers"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        created_at: Utc::now(),
        updated_at: None,
    })
    .collect()
}

pub fn default_showcase() -> Vec<ShowcaseProduct> {
    [
        (
            "1",
            "iPhone 15 Pro",
            "Titanium, the A17 Pro chip and next-level photography in an ultralight design.",
            "iphone-15-pro-finish-select-202309-6-1inch-naturaltitanium?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1692895395658",
            "1",
        ),
        (
            "2",
            "Apple Watch Ultra 2",
            "Built for adventure, sport and health, with precision GPS and long battery life.",
            "watch-ultra-2-hero-select-202309?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1693361190559",
            "3",
        ),
        (
            "3",
            "MacBook Pro 16\"",
            "Exceptional performance with the M3 Max chip and a Liquid Retina XDR display.",
            "mbp16-spacegray-select-202310?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1697311054435",
            "4",
        ),
        (
            "4",
            "iPad Pro 11\"",
            "Limitless creativity with the M2 chip and second-generation Apple Pencil.",
            "ipad-pro-11-select-wifi-spacegray-202210?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1664411207306",
            "2",
        ),
        (
            "5",
            "AirPods Pro (2nd generation)",
            "Immersive sound with active noise cancellation and personalized spatial audio.",
            "MQD83?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1660803972361",
            "3",
        ),
        (
            "6",
            "Mac Studio",
            "Extreme desktop power with M2 Max and M2 Ultra chips for professional workflows.",
            "mac-studio-select-202306?wid=1200&hei=1200&fmt=jpeg&qlt=90&.v=1684345161143",
            "4",
        ),
    ]
    .into_iter()
    .map(|(id, name, description, path, category)| ShowcaseProduct {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        image: image(path),
        category: category.to_string(),
        created_at: Utc::now(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let ids: HashSet<_> = default_products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 10);

        let ids: HashSet<_> = default_showcase().into_iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_seed_products_reference_seed_categories() {
        let categories: HashSet<_> = default_categories().into_iter().map(|c| c.id).collect();
        for product in default_products() {
            assert!(categories.contains(&product.category), "{} has unknown category", product.name);
        }
    }
}
