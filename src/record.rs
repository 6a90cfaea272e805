use serde::{Deserialize, Serialize};

use crate::normalize::Audience;

// absent fields hold "" or 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub scraped_at: String,
    pub section: String,
    pub subcategory: String,
    pub name: String,
    pub brand: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub rating_listing: String,
    pub rating_detail: String,
    pub reviews_listing: u64,
    pub reviews_detail: u64,
    pub audience: Audience,
    pub availability: String,
    pub seller: String,
    pub product_url: String,
    pub image_url: String,
    pub detail_images: String,
    pub short_description: String,
    pub full_description: String,
    pub breadcrumb: String,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ScrapedAt,
    Section,
    TopSection,
    Subcategory,
    Name,
    Brand,
    Price,
    OriginalPrice,
    Discount,
    Rating,
    RatingListing,
    RatingDetail,
    ReviewsListing,
    ReviewsDetail,
    Audience,
    Availability,
    Seller,
    ProductUrl,
    ImageUrl,
    ImageUrlListing,
    DetailImages,
    ShortDescription,
    FullDescription,
    Breadcrumb,
    Page,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::ScrapedAt => "Scraped At",
            Column::Section => "Section",
            Column::TopSection => "Top Section",
            Column::Subcategory => "Subcategory",
            Column::Name => "Product Name",
            Column::Brand => "Brand (heuristic/listing)",
            Column::Price => "Price",
            Column::OriginalPrice => "Original Price",
            Column::Discount => "Discount",
            Column::Rating => "Rating",
            Column::RatingListing => "Rating (listing)",
            Column::RatingDetail => "Rating (detail)",
            Column::ReviewsListing => "Reviews Count (listing)",
            Column::ReviewsDetail => "Reviews Count (detail)",
            Column::Audience => "Target Audience",
            Column::Availability => "Availability",
            Column::Seller => "Seller",
            Column::ProductUrl => "Product URL",
            Column::ImageUrl => "Image URL",
            Column::ImageUrlListing => "Image URL (listing)",
            Column::DetailImages => "Image URLs (detail)",
            Column::ShortDescription => "Short Description",
            Column::FullDescription => "Full Description",
            Column::Breadcrumb => "Breadcrumb",
            Column::Page => "Page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSet {
    Basic,
    Rich,
}

const BASIC: &[Column] = &[
    Column::ScrapedAt,
    Column::Section,
    Column::Name,
    Column::Price,
    Column::Rating,
    Column::ImageUrl,
    Column::ProductUrl,
];

const RICH: &[Column] = &[
    Column::ScrapedAt,
    Column::TopSection,
    Column::Subcategory,
    Column::Name,
    Column::Brand,
    Column::Price,
    Column::OriginalPrice,
    Column::Discount,
    Column::RatingListing,
    Column::RatingDetail,
    Column::ReviewsListing,
    Column::ReviewsDetail,
    Column::Audience,
    Column::Availability,
    Column::Seller,
    Column::ProductUrl,
    Column::ImageUrlListing,
    Column::DetailImages,
    Column::ShortDescription,
    Column::FullDescription,
    Column::Breadcrumb,
    Column::Page,
];

impl ColumnSet {
    pub fn columns(self) -> &'static [Column] {
        match self {
            ColumnSet::Basic => BASIC,
            ColumnSet::Rich => RICH,
        }
    }

    pub fn headers(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.header()).collect()
    }
}

impl ProductRecord {
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::ScrapedAt => self.scraped_at.clone(),
            Column::Section | Column::TopSection => self.section.clone(),
            Column::Subcategory => self.subcategory.clone(),
            Column::Name => self.name.clone(),
            Column::Brand => self.brand.clone(),
            Column::Price => self.price.clone(),
            Column::OriginalPrice => self.original_price.clone(),
            Column::Discount => self.discount.clone(),
            Column::Rating | Column::RatingListing => self.rating_listing.clone(),
            Column::RatingDetail => self.rating_detail.clone(),
            Column::ReviewsListing => self.reviews_listing.to_string(),
            Column::ReviewsDetail => self.reviews_detail.to_string(),
            Column::Audience => self.audience.to_string(),
            Column::Availability => self.availability.clone(),
            Column::Seller => self.seller.clone(),
            Column::ProductUrl => self.product_url.clone(),
            Column::ImageUrl | Column::ImageUrlListing => self.image_url.clone(),
            Column::DetailImages => self.detail_images.clone(),
            Column::ShortDescription => self.short_description.clone(),
            Column::FullDescription => self.full_description.clone(),
            Column::Breadcrumb => self.breadcrumb.clone(),
            Column::Page => self.page.to_string(),
        }
    }

    pub fn row(&self, set: ColumnSet) -> Vec<String> {
        set.columns().iter().map(|c| self.cell(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_sets_match_the_published_layouts() {
        assert_eq!(ColumnSet::Basic.columns().len(), 7);
        assert_eq!(ColumnSet::Rich.columns().len(), 22);
        assert_eq!(ColumnSet::Basic.headers()[1], "Section");
        assert_eq!(ColumnSet::Rich.headers()[1], "Top Section");
        assert_eq!(ColumnSet::Rich.headers().last(), Some(&"Page"));
    }

    #[test]
    fn empty_record_still_fills_every_column() {
        let rec = ProductRecord::default();
        let row = rec.row(ColumnSet::Rich);
        assert_eq!(row.len(), 22);
        assert_eq!(row[10], "0");
        assert_eq!(row[11], "0");
        assert_eq!(row[12], "Unspecified");
        assert_eq!(row[3], "");
    }
}
