use std::sync::Arc;

use foodie_core::validate::required_text;
use foodie_core::{Collection, ServiceError, now_rfc3339};
use foodie_kv::KvStore;

use crate::model::{Restaurant, RestaurantData};

/// The restaurant service. One collection, upserted by place id.
pub struct RestaurantService {
    restaurants: Collection<Restaurant>,
}

impl RestaurantService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            restaurants: Collection::new(kv),
        }
    }

    /// Insert or update the restaurant with `data.place_id`. An existing
    /// document keeps its id, creation time and comment list; the
    /// descriptive fields are replaced by the payload.
    pub fn upsert(&self, data: RestaurantData) -> Result<Restaurant, ServiceError> {
        let place_id = required_text("place_id", data.place_id)?;

        match self.find_by_place_id(&place_id)? {
            Some(mut existing) => {
                existing.name = data.name;
                existing.address = data.address;
                existing.phone_number = data.phone_number;
                existing.price = data.price;
                existing.cuisine = data.cuisine;
                existing.rating = data.rating;
                existing.updated_at = now_rfc3339();
                self.restaurants.save(existing)
            }
            None => self.restaurants.insert(Restaurant {
                id: String::new(),
                place_id,
                name: data.name,
                address: data.address,
                phone_number: data.phone_number,
                price: data.price,
                cuisine: data.cuisine,
                rating: data.rating,
                comments: Vec::new(),
                created_at: String::new(),
                updated_at: String::new(),
            }),
        }
    }

    /// Every stored restaurant.
    pub fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        self.restaurants.list()
    }

    pub fn find_by_place_id(&self, place_id: &str) -> Result<Option<Restaurant>, ServiceError> {
        self.restaurants.find_one(|r| r.place_id == place_id)
    }
}
