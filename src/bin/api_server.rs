use imping_geo::api::{create_router, AppState};
use imping_geo::{CoordinateConverter, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let settings = Settings::load()?;
    let state = AppState {
        converter: CoordinateConverter::new(),
        default_params: settings.idw_params()?,
    };

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("🚀 {} v{} listening on http://{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), address);
    info!("  GET  /api/lv95towgs84?easting=<e>&northing=<n>");
    info!("  GET  /api/wgs84tolv95?latitude=<lat>&longitude=<lon>");
    info!("  POST /api/interpolate (application/json)");
    info!("  POST /api/stations (multipart/form-data: csv file)");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
