use crate::config::PALETTE;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ColorPickerProps {
    pub selected: String,
    pub on_select: Callback<String>,
}

#[function_component(ColorPicker)]
pub fn color_picker(props: &ColorPickerProps) -> Html {
    html! {
        <div id="color-picker" style="display:flex; gap:6px; align-items:center;">
            { for PALETTE.iter().map(|&color| {
                let selected = props.selected == color;
                let on_select = props.on_select.clone();
                let onclick = Callback::from(move |_: MouseEvent| on_select.emit(color.to_string()));
                let border = if selected { "3px solid #222" } else { "1px solid #999" };
                html! {
                    <button
                        class={classes!("color-choice", selected.then_some("selected"))}
                        title={color}
                        style={format!("width:28px; height:28px; border-radius:50%; cursor:pointer; background:{}; border:{};", color, border)}
                        {onclick}
                    />
                }
            }) }
        </div>
    }
}
