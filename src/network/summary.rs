//! Tabular network description, in the spirit of Keras' `model.summary()`

use super::Network;

impl Network {
    /// Render a per-layer table: name, class, output shape, parameter count,
    /// followed by total / trainable / non-trainable aggregates.
    #[must_use]
    pub fn summary(&self) -> String {
        let rule = "─".repeat(68);

        let mut output = format!("Model: {}\n", self.name);
        output.push_str(&rule);
        output.push('\n');
        output.push_str(&format!(
            "{:<32} | {:<20} | {:>8}\n",
            "Layer (type)", "Output shape", "Param #"
        ));
        output.push_str(&rule);
        output.push('\n');

        for ((layer, shape), params) in self.layers.iter().zip(&self.shapes).zip(&self.params) {
            output.push_str(&format!(
                "{:<32} | {:<20} | {:>8}\n",
                format!("{} ({})", layer.name, layer.kind.class_name()),
                format_shape(shape),
                params,
            ));
        }

        output.push_str(&rule);
        output.push('\n');
        let total = self.param_count();
        let trainable = self.trainable_param_count();
        output.push_str(&format!("Total params: {total}\n"));
        output.push_str(&format!("Trainable params: {trainable}\n"));
        output.push_str(&format!("Non-trainable params: {}\n", total - trainable));
        output
    }
}

fn format_shape(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    format!("[{}]", dims.join(", "))
}
