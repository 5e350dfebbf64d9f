use crate::app::App;

mod app;
mod collage_grid;
mod components;
mod storage;

fn main() {
    yew::Renderer::<App>::new().render();
}
