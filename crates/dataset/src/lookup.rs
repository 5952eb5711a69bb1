//! Per-kind lookups on record collections.

use crate::models::{Categories, Category, Image, Images, License, Licenses};

/// Name lookup for category collections.
pub trait CategoryLookup {
    /// Returns the first category called `name`.
    fn get_by_name(&self, name: &str) -> Option<&Category>;
}

impl CategoryLookup for Categories {
    fn get_by_name(&self, name: &str) -> Option<&Category> {
        self.find(|category| category.name == name)
    }
}

/// Name and url lookups for license collections.
pub trait LicenseLookup {
    fn get_by_name(&self, name: &str) -> Option<&License>;

    fn get_by_url(&self, url: &str) -> Option<&License>;
}

impl LicenseLookup for Licenses {
    fn get_by_name(&self, name: &str) -> Option<&License> {
        self.find(|license| license.name == name)
    }

    fn get_by_url(&self, url: &str) -> Option<&License> {
        self.find(|license| license.url.as_deref() == Some(url))
    }
}

/// File name lookups for image collections.
pub trait ImageLookup {
    fn get_by_file_name(&self, file_name: &str) -> Option<&Image>;

    /// Removes the first image stored as `file_name` and returns it.
    fn delete_by_file_name(&mut self, file_name: &str) -> Option<Image>;
}

impl ImageLookup for Images {
    fn get_by_file_name(&self, file_name: &str) -> Option<&Image> {
        self.find(|image| image.file_name == file_name)
    }

    fn delete_by_file_name(&mut self, file_name: &str) -> Option<Image> {
        self.delete_where(|image| image.file_name == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cocoql_core::Collection;

    #[test]
    fn test_category_by_name() {
        let categories = Collection::from_records(vec![
            Category::new("car").with_id(1),
            Category::new("bus").with_id(2),
        ]);
        assert_eq!(categories.get_by_name("bus").map(|c| c.id), Some(2));
        assert!(categories.get_by_name("tram").is_none());
    }

    #[test]
    fn test_license_lookups() {
        let licenses = Collection::from_records(vec![
            License::new("Attribution").with_id(1).with_url("http://a"),
            License::new("NoDerivs").with_id(2),
        ]);
        assert_eq!(LicenseLookup::get_by_name(&licenses, "NoDerivs").map(|l| l.id), Some(2));
        assert_eq!(licenses.get_by_url("http://a").map(|l| l.id), Some(1));
        assert!(licenses.get_by_url("http://b").is_none());
    }

    #[test]
    fn test_image_by_file_name() {
        let mut images = Collection::from_records(vec![
            Image::new("1.jpg").with_id(1),
            Image::new("2.jpg").with_id(2),
        ]);
        assert_eq!(images.get_by_file_name("2.jpg").map(|i| i.id), Some(2));

        let removed = images.delete_by_file_name("1.jpg").unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(images.len(), 1);
        assert!(images.delete_by_file_name("1.jpg").is_none());
    }
}
