fn main() -> textile_color::Result<()> {
    textile_color::run(wild::args_os())
}
