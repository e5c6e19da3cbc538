mod mesh;
mod shapes;
mod vector;
