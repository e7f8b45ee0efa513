fn main() {
    nih_plug::nih_export_standalone::<reverb_plugin::StereoReverbPlugin>();
}
