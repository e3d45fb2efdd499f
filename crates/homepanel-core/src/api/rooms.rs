use super::HomeApi;
use crate::cache::{CacheKey, Resource};
use crate::ports::ApiRequest;
use crate::validation;
use crate::Result;
use homepanel_types::{NewRoom, Room, RoomUpdate, TemperatureReading};

impl HomeApi {
    pub async fn rooms(&self) -> Result<Vec<Room>> {
        self.query(CacheKey::list(Resource::Rooms), "/rooms".into())
            .await
    }

    pub async fn room(&self, id: i64) -> Result<Room> {
        self.query(CacheKey::item(Resource::Rooms, id), format!("/rooms/{}", id))
            .await
    }

    pub async fn create_room(&self, room: &NewRoom) -> Result<Room> {
        validation::required("name", &room.name)?;
        self.mutate(
            ApiRequest::post("/rooms").json(room)?,
            &[CacheKey::list(Resource::Rooms)],
        )
        .await
    }

    pub async fn update_room(&self, id: i64, update: &RoomUpdate) -> Result<Room> {
        if let Some(name) = &update.name {
            validation::required("name", name)?;
        }
        self.mutate(
            ApiRequest::patch(format!("/rooms/{}", id)).json(update)?,
            &[
                CacheKey::list(Resource::Rooms),
                CacheKey::item(Resource::Rooms, id),
            ],
        )
        .await
    }

    pub async fn delete_room(&self, id: i64) -> Result<()> {
        self.mutate_empty(
            ApiRequest::delete(format!("/rooms/{}", id)),
            &[
                CacheKey::list(Resource::Rooms),
                CacheKey::item(Resource::Rooms, id),
                CacheKey::item(Resource::Temperature, id),
            ],
        )
        .await
    }

    /// Recent temperature readings for a room, oldest first
    pub async fn temperature(&self, room_id: i64) -> Result<Vec<TemperatureReading>> {
        self.query(
            CacheKey::item(Resource::Temperature, room_id),
            format!("/temperature/{}", room_id),
        )
        .await
    }
}
