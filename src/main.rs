use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = portfolio_api::Config::load().expect("configuration must be valid");

    portfolio_api::build_rocket(config)
}
