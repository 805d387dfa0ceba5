// HTTP handler bindings for the player service
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Mapping rejected uploads to 422 responses

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use tank_commander::bot::Bot;
use tank_commander::types::{GameArguments, GameState, Order};

/// GET /ping endpoint
#[get("/ping")]
pub fn ping(bot: &rocket::State<Bot>) -> Json<bool> {
    Json(bot.ping())
}

/// POST /parameters endpoint
/// One-time game constants
#[post("/parameters", format = "json", data = "<args>")]
pub fn upload_parameters(
    bot: &rocket::State<Bot>,
    args: Json<GameArguments>,
) -> Result<Status, status::Custom<String>> {
    bot.upload_parameters(args.into_inner())
        .map(|_| Status::Ok)
        .map_err(|e| status::Custom(Status::UnprocessableEntity, e.to_string()))
}

/// POST /map endpoint
/// Square grid of cell values
#[post("/map", format = "json", data = "<grid>")]
pub fn upload_map(
    bot: &rocket::State<Bot>,
    grid: Json<Vec<Vec<i32>>>,
) -> Result<Status, status::Custom<String>> {
    bot.upload_map(&grid)
        .map(|_| Status::Ok)
        .map_err(|e| status::Custom(Status::UnprocessableEntity, e.to_string()))
}

/// POST /tanks endpoint
#[post("/tanks", format = "json", data = "<ids>")]
pub fn assign_tanks(bot: &rocket::State<Bot>, ids: Json<Vec<i32>>) -> Status {
    bot.assign_tanks(&ids);
    Status::Ok
}

/// POST /state endpoint
/// Called every round before orders are requested
#[post("/state", format = "json", data = "<state>")]
pub fn latest_state(bot: &rocket::State<Bot>, state: Json<GameState>) -> Status {
    bot.latest_state(state.into_inner());
    Status::Ok
}

/// GET /orders endpoint
#[get("/orders")]
pub fn get_new_orders(bot: &rocket::State<Bot>) -> Json<Vec<Order>> {
    Json(bot.get_new_orders())
}
