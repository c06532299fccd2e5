use next_station_board::components::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
